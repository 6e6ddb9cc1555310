//! Parsing of RPM repository metadata manifests.
//!
//! Every yum/dnf repository publishes `repodata/repomd.xml`, a small manifest
//! enumerating the metadata files available for that snapshot of the
//! repository. Each `<data>` record names one file: its type (`primary_db`,
//! `filelists_db`, `other`, `group`, ...), where to find it relative to the
//! repository root, and checksums and sizes for the compressed and
//! uncompressed payload.
//!
//! Parsing is forward-compatible: unknown record types are kept as
//! [`DataKind::Other`], and unknown elements or attributes are ignored.
//! Checksums are exposed but never verified here.

pub mod error;
mod models;
mod parse;

pub use crate::models::{Checksum, DataKind, Location, MetadataEntry, RepoMetadata};
