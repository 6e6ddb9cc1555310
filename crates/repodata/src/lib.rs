//! Streaming reads over decompressed repository metadata databases.
//!
//! createrepo publishes two SQLite databases that, between them, say which
//! package installs which command:
//!
//! - **filelists**: `filelist(pkgKey, dirname, filenames, filetypes)`, one row
//!   per package per directory, with every file in that directory packed into
//!   a single `/`-separated `filenames` column.
//! - **primary**: `packages(pkgKey, name, arch, ...)`, one row per package
//!   build.
//!
//! [`filelist::scan`] streams the packages that install regular files into a
//! `bin` directory, and [`primary::join`] resolves each of those packages to
//! its name, expanding them into one [`BinaryPackage`] per command. Neither
//! stage loads a whole table into memory (unless asked to with
//! [`JoinStrategy::Preload`]).
//!
//! Both stages take ownership of a [`LocalDatabase`]; the backing temporary
//! file is deleted once the stage's stream has been exhausted or dropped.

mod db;
pub mod error;
pub mod filelist;
#[cfg(any(test, feature = "fixture"))]
pub mod fixture;
mod models;
pub mod primary;

pub use crate::db::{DatabaseRole, LocalDatabase};
pub use crate::models::{BinaryPackage, PackageBinaries, PackageKey};
pub use crate::primary::{EXCLUDED_ARCH, JoinStrategy};
