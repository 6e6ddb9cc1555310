//! Writing and publishing command-not-found databases.
//!
//! The output is a single SQLite file, `{dir}/{name}.sqlite`, holding one
//! table:
//!
//! ```sql
//! CREATE TABLE cmdpkg (cmd TEXT, pkg TEXT, tips TEXT);
//! ```
//!
//! with one row per (command, package) pair. `tips` is always empty. Rows
//! are not deduplicated and carry no particular order.
//!
//! Writing is split in two so a caller can decide whether the result is
//! worth keeping: [`Writer::insert_all`] fills a scratch file next to the
//! destination and hands back a [`StagedOutput`], and
//! [`StagedOutput::publish`] renames it over the destination. Until then,
//! a previously published file is left exactly as it was, and dropping
//! either value deletes the scratch file.

pub mod error;
mod writer;

pub use crate::writer::{OUTPUT_EXTENSION, StagedOutput, WriteReport, Writer};
