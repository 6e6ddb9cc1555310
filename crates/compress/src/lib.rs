//! Decompression of repository metadata payloads.
//!
//! Repository metadata databases are published as bzip2-compressed SQLite
//! files (`*-primary.sqlite.bz2`, `*-filelists.sqlite.bz2`). This crate wraps
//! the bzip2 library behind a small [`Compression`] enum, providing:
//!
//! - **Format detection** from file extensions ([`Compression::try_from_path`])
//!   or magic bytes ([`Compression::from_magic_bytes`])
//! - **In-memory** compression ([`Compression::compress`]), used to build
//!   fixtures
//! - **Streaming** decompression of an async reader
//!   (`Compression::async_wrap_reader`, behind the `async` feature, using
//!   [`futures`](::futures::io) traits rather than Tokio's)
//!
//! Other formats a repository might use (gzip, xz, zstd) are recognised by
//! extension so they can be rejected with a clear
//! [`UnsupportedFormat`](crate::error::ErrorKind::UnsupportedFormat) error,
//! but they cannot be decoded.

mod construct;
pub mod error;
#[cfg(feature = "async")]
mod futures;
mod ops;
mod util;

/// A supported compression format. Defaults to [`None`](Self::None)
/// (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2)
    Bzip2,
}

#[cfg(test)]
mod tests {
    use crate::Compression;

    #[test]
    fn compression_default() {
        assert_eq!(Compression::default(), Compression::None);
    }
}
