use serde::Deserialize;
use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The `type` attribute of a manifest `<data>` record.
///
/// Only the two SQLite databases matter for building a command lookup table;
/// everything else (`primary`, `filelists`, `other`, `group`, `updateinfo`,
/// `modules`, ...) is preserved verbatim so it can still be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum DataKind {
    /// `primary_db`: package names, versions and architectures.
    PrimaryDb,
    /// `filelists_db`: the files each package installs.
    FilelistsDb,
    /// Any other record type.
    Other(String),
}
impl DataKind {
    pub fn as_str(&self) -> &str {
        match self {
            DataKind::PrimaryDb => "primary_db",
            DataKind::FilelistsDb => "filelists_db",
            DataKind::Other(kind) => kind,
        }
    }
}
impl From<String> for DataKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "primary_db" => Self::PrimaryDb,
            "filelists_db" => Self::FilelistsDb,
            _ => Self::Other(value),
        }
    }
}
impl FromStr for DataKind {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.to_string().into())
    }
}
impl Display for DataKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("primary_db", DataKind::PrimaryDb)]
    #[case("filelists_db", DataKind::FilelistsDb)]
    #[case("primary", DataKind::Other("primary".to_string()))]
    #[case("filelists", DataKind::Other("filelists".to_string()))]
    // Type tags are case-sensitive.
    #[case("PRIMARY_DB", DataKind::Other("PRIMARY_DB".to_string()))]
    fn test_from_str(#[case] input: &str, #[case] expected: DataKind) {
        let kind: DataKind = input.parse().unwrap();
        assert_eq!(kind, expected);
        assert_eq!(kind.to_string(), input);
    }
}
