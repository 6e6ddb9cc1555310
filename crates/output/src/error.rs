//! Output Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An output error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for output operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The output name can't be used as a file name.
    #[display("invalid output name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// The output directory, scratch file or table could not be created.
    #[display("could not create output database")]
    Create,
    /// A row could not be inserted or the transaction could not commit.
    #[display("could not write to output database")]
    Insert,
    /// The finished database could not be moved into place.
    #[display("could not publish output database")]
    Publish,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Disk full, permissions, a busy file system: all worth another go
        // once someone has looked at it.
        !matches!(self, ErrorKind::InvalidName(_))
    }
}
