//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed.
    #[display("could not build HTTP client")]
    Client,
    /// The request never completed: DNS, connection, TLS, or the body was
    /// cut off mid-transfer.
    #[display("network error")]
    Network,
    /// The server answered, but not with a success status.
    #[display("unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),
    /// The manifest was retrieved but could not be parsed.
    #[display("invalid repository manifest")]
    Manifest,
    /// The payload is not bzip2, by extension or by content.
    #[display("unsupported payload format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// The payload claimed to be bzip2 but is corrupt or truncated.
    #[display("payload failed to decompress")]
    Decompress,
    /// The scratch file could not be created or written.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::Network | ErrorKind::Io => true,
            ErrorKind::Status(code) => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Network, true)]
    #[case(ErrorKind::Io, true)]
    #[case(ErrorKind::Status(404), false)]
    #[case(ErrorKind::Status(429), true)]
    #[case(ErrorKind::Status(503), true)]
    #[case(ErrorKind::Manifest, false)]
    #[case(ErrorKind::Decompress, false)]
    #[case(ErrorKind::UnsupportedFormat("gz".to_string()), false)]
    fn test_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::Status(404).to_string(), "unexpected HTTP status 404");
        assert_eq!(ErrorKind::UnsupportedFormat("xz".to_string()).to_string(), "unsupported payload format: xz");
    }
}
