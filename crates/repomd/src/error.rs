//! Manifest Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A manifest error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document is not well-formed XML, or a known field could not be
    /// parsed (for example a non-numeric `<size>`).
    #[display("malformed repository manifest")]
    Malformed,
    /// The document parsed, but its root element is not `<repomd>`.
    #[display("not a repository manifest: root element is <{_0}>")]
    MissingRoot(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A manifest is either valid or it isn't; fetching it again is the
        // caller's concern, not ours.
        false
    }
}
