use crate::models::DataKind;
use serde::Deserialize;
use time::UtcDateTime;

/// A checksum declared by the manifest, e.g.
/// `<checksum type="sha256">0a1b...</checksum>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Checksum {
    /// Algorithm name (`sha256`, `sha1`, ...).
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// `<location href="repodata/...-primary.sqlite.bz2"/>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    /// Path of the payload, relative to the repository base URL.
    #[serde(rename = "@href")]
    pub href: String,
}

/// One `<data>` record of the manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetadataEntry {
    #[serde(rename = "@type")]
    pub kind: DataKind,
    /// Checksum of the compressed payload.
    #[serde(default)]
    pub checksum: Option<Checksum>,
    /// Checksum of the decompressed payload.
    #[serde(rename = "open-checksum", default)]
    pub open_checksum: Option<Checksum>,
    pub location: Location,
    /// Seconds since the Unix epoch. Older createrepo versions write
    /// fractional timestamps, hence the float.
    #[serde(default)]
    pub timestamp: Option<f64>,
    /// Size of the compressed payload, in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Size of the decompressed payload, in bytes.
    #[serde(rename = "open-size", default)]
    pub open_size: Option<u64>,
    /// Schema version of `*_db` payloads.
    #[serde(default)]
    pub database_version: Option<u32>,
}
impl MetadataEntry {
    /// The declared modification time, if present and representable.
    pub fn modified(&self) -> Option<UtcDateTime> {
        let timestamp = self.timestamp?;
        if !timestamp.is_finite() {
            return None;
        }
        // Sub-second precision is noise; drop it.
        UtcDateTime::from_unix_timestamp(timestamp.trunc() as i64).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(timestamp: Option<f64>) -> MetadataEntry {
        MetadataEntry {
            kind: DataKind::PrimaryDb,
            checksum: None,
            open_checksum: None,
            location: Location { href: "repodata/primary.sqlite.bz2".to_string() },
            timestamp,
            size: None,
            open_size: None,
            database_version: None,
        }
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(0.0), Some(0))]
    #[case(Some(1587512263.0), Some(1587512263))]
    #[case(Some(1587512263.75), Some(1587512263))]
    #[case(Some(f64::NAN), None)]
    fn test_modified(#[case] timestamp: Option<f64>, #[case] expected: Option<i64>) {
        assert_eq!(entry(timestamp).modified().map(|m| m.unix_timestamp()), expected);
    }
}
