use std::fmt::{Display, Formatter, Result as FmtResult};

/// Separator packing every file of a directory into one `filenames` column.
const FILENAME_SEPARATOR: char = '/';

/// Identifies a package across the filelists and primary databases of one
/// repository snapshot.
///
/// createrepo stores it as an integer, but it is treated as opaque text here
/// and only ever bound as a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageKey(String);
impl PackageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for PackageKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl From<&str> for PackageKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
impl Display for PackageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Every command one package installs into one `bin` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageBinaries {
    pub key: PackageKey,
    pub binaries: Vec<String>,
}
impl PackageBinaries {
    /// Unpack a `filenames` column. Empty segments (a leading, trailing or
    /// doubled separator) are not commands and are dropped.
    pub fn new(key: impl Into<PackageKey>, filenames: &str) -> Self {
        let binaries = filenames
            .split(FILENAME_SEPARATOR)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self { key: key.into(), binaries }
    }
}

/// A command and the package that provides it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinaryPackage {
    pub binary: String,
    pub package: String,
}
impl BinaryPackage {
    pub fn new(binary: impl Into<String>, package: impl Into<String>) -> Self {
        Self { binary: binary.into(), package: package.into() }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FilelistRow {
    pkg_key: String,
    filenames: Option<String>,
}
impl From<FilelistRow> for PackageBinaries {
    fn from(row: FilelistRow) -> Self {
        PackageBinaries::new(row.pkg_key, row.filenames.as_deref().unwrap_or_default())
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PackageRow {
    pub(crate) pkg_key: String,
    pub(crate) name: Option<String>,
}
