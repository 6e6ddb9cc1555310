//! HTTP retrieval of repository manifests and metadata databases.
//!
//! A [`Fetcher`] is bound to one repository base URL. It fetches and parses
//! `repodata/repomd.xml` ([`Fetcher::manifest`]), and materializes the
//! bzip2-compressed SQLite payloads the manifest points at as local scratch
//! files ([`Fetcher::database`]). Payloads are decompressed chunk by chunk
//! as they arrive; neither the compressed nor the decompressed payload is
//! ever held in memory in full.
//!
//! Nothing is retried. Every failure is reported through
//! [`ErrorKind`](crate::error::ErrorKind), and
//! [`is_retryable`](crate::error::ErrorKind::is_retryable) tells the caller
//! whether trying again could help.

pub mod error;
mod fetcher;

pub use crate::fetcher::{FetchOptions, Fetcher};
