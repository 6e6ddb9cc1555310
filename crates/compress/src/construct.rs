use crate::Compression;
use crate::error::{Error, ErrorKind};
use std::path::Path;

const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];

impl Compression {
    /// Detect compression from a file extension, failing on compression
    /// formats that are recognised but unsupported.
    ///
    /// A path without an extension, or with a non-compression extension such
    /// as `.sqlite`, is uncompressed.
    pub fn try_from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let Some(ext) = path.as_ref().extension().and_then(|ext| ext.to_str()) else {
            return Ok(Compression::None);
        };
        match ext.to_lowercase().as_str() {
            "bz2" => Ok(Compression::Bzip2),
            // Formats createrepo can emit, but which we do not decode.
            "gz" | "xz" | "lzma" | "zst" | "br" => exn::bail!(ErrorKind::UnsupportedFormat(ext.to_string())),
            _ => Ok(Compression::None),
        }
    }

    /// Detect compression format from magic bytes.
    ///
    /// Returns `None` variant if no magic bytes match or if the input
    /// is too short to detect any format.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&BZIP2_MAGIC) {
            return Compression::Bzip2;
        }
        Compression::None
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("repodata/primary.sqlite", Compression::None)]
    #[case("repodata/primary", Compression::None)]
    // `.bz2` is a dotfile with no extension (like `.bashrc`), and therefore
    // with no extension is considered to have no compression.
    #[case(".bz2", Compression::None)]
    #[case("repodata/0a1b-primary.sqlite.bz2", Compression::Bzip2)]
    #[case("repodata/0a1b-filelists.sqlite.BZ2", Compression::Bzip2)]
    fn test_try_from_path(#[case] test: &str, #[case] expected: Compression) {
        assert_eq!(Compression::try_from_path(test).unwrap(), expected);
    }

    #[rstest]
    #[case("repodata/0a1b-primary.sqlite.gz", "gz")]
    #[case("repodata/0a1b-primary.sqlite.xz", "xz")]
    #[case("repodata/0a1b-primary.sqlite.zst", "zst")]
    fn test_try_from_path_unsupported(#[case] test: &str, #[case] ext: &str) {
        let err = Compression::try_from_path(test).unwrap_err();
        assert_eq!(*err, ErrorKind::UnsupportedFormat(ext.to_string()));
    }

    #[rstest]
    #[case(b"SQLite format 3\0", Compression::None)]
    #[case(b"", Compression::None)]
    #[case(&[0x42, 0x5A], Compression::None)]
    #[case(&[0x42, 0x5A, 0x68, 0x39], Compression::Bzip2)]
    #[case(&[0x1F, 0x8B, 0x08, 0x00], Compression::None)]
    fn test_from_magic_bytes(#[case] bytes: &[u8], #[case] expected: Compression) {
        assert_eq!(Compression::from_magic_bytes(bytes), expected);
    }
}
