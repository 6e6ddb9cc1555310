//! Pipeline Error Types
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.
//! Every stage's own error is kept as the source of the pipeline error, so
//! the full tree (pipeline stage → crate → library) is available with `{:?}`.

use cnfdb_repodata::DatabaseRole;
use cnfdb_repomd::DataKind;
use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies which stage failed, and for which metadata entry.
///
/// ### Setup Errors
/// - [`ErrorKind::Setup`]
///
/// ### Stage Errors
/// - [`ErrorKind::Manifest`]
/// - [`ErrorKind::NoMetadata`]
/// - [`ErrorKind::Fetch`]
/// - [`ErrorKind::Decompress`]
/// - [`ErrorKind::Query`]
/// - [`ErrorKind::Write`]
/// - [`ErrorKind::Timeout`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The pipeline could not be constructed.
    #[display("pipeline setup failed")]
    Setup,
    /// `repodata/repomd.xml` could not be fetched or parsed.
    #[display("could not retrieve repository manifest")]
    Manifest,
    /// The manifest lists no entry of a required kind.
    #[display("repository manifest has no {_0} entry")]
    NoMetadata(#[error(not(source))] DataKind),
    /// A metadata payload could not be downloaded.
    #[display("could not download {_0}")]
    Fetch(#[error(not(source))] DataKind),
    /// A metadata payload downloaded but is not a readable bzip2 stream.
    #[display("could not decompress {_0}")]
    Decompress(#[error(not(source))] DataKind),
    /// A metadata database could not be read.
    #[display("could not read {_0} database")]
    Query(#[error(not(source))] DatabaseRole),
    /// The output database could not be written or published.
    #[display("could not write output database")]
    Write,
    /// The run exceeded its deadline.
    #[display("deadline exceeded")]
    Timeout,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Manifest | ErrorKind::Fetch(_) | ErrorKind::Timeout)
    }
}
