//! Builds a command-not-found database from an RPM repository.
//!
//! A [`Pipeline`] fetches the repository manifest, downloads the
//! `filelists_db` and `primary_db` payloads concurrently, streams the
//! filelist scan into the primary join, and the join into the output writer.
//! The output is published only if every stage finished cleanly; on any
//! failure the previously published database stays as it was and every
//! scratch file is removed.
//!
//! Progress is observable as a stream of [`Stage`]s ([`Pipeline::events`])
//! or through a callback ([`Pipeline::run_with_progress`]).

pub mod error;
mod pipeline;

pub use crate::pipeline::{Pipeline, PipelineOptions, Stage};
pub use cnfdb_output::WriteReport;
pub use cnfdb_repodata::JoinStrategy;
