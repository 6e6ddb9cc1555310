mod entry;
mod kind;

pub use self::entry::{Checksum, Location, MetadataEntry};
pub use self::kind::DataKind;
use serde::Deserialize;

/// A parsed `repomd.xml`.
///
/// Immutable once parsed; construct one with [`RepoMetadata::parse`] or
/// [`str::parse`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepoMetadata {
    #[serde(default)]
    pub revision: Option<i64>,
    /// Every `<data>` record, in document order.
    #[serde(rename = "data", default)]
    pub entries: Vec<MetadataEntry>,
}
impl RepoMetadata {
    /// The first entry of the given kind. Later duplicates are ignored.
    pub fn find(&self, kind: &DataKind) -> Option<&MetadataEntry> {
        self.entries.iter().find(|entry| &entry.kind == kind)
    }
}
