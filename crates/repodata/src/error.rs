//! Repodata Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::DatabaseRole;
use derive_more::{Display, Error};

/// A repodata error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for repodata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The decompressed file could not be opened as an SQLite database.
    #[display("could not open {_0} database")]
    Open(#[error(not(source))] DatabaseRole),
    /// A query failed: missing table or column, or a row that doesn't
    /// decode. The database doesn't have the schema we expect.
    #[display("query against {_0} database failed")]
    Query(#[error(not(source))] DatabaseRole),
    /// A database was handed to the wrong stage.
    #[display("expected a {expected} database, got a {found} database")]
    Role { expected: DatabaseRole, found: DatabaseRole },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Local, read-only, single-reader databases: nothing transient here.
        false
    }
}
