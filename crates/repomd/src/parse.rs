use crate::RepoMetadata;
use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::str::FromStr;
use tracing::instrument;

const ROOT: &[u8] = b"repomd";

impl RepoMetadata {
    /// Parse a `repomd.xml` document.
    ///
    /// Fails with [`ErrorKind::Malformed`] if the document isn't well-formed
    /// XML, or with [`ErrorKind::MissingRoot`] if its root element isn't
    /// `<repomd>`.
    #[instrument(skip(document), fields(size = document.len(), entries))]
    pub fn parse(document: &str) -> Result<Self> {
        check_root(document)?;
        let metadata: RepoMetadata = quick_xml::de::from_str(document).or_raise(|| ErrorKind::Malformed)?;
        tracing::Span::current().record("entries", metadata.entries.len());
        Ok(metadata)
    }
}
impl FromStr for RepoMetadata {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The serde deserializer doesn't care what the root element is called, so
/// any XML document with no `<data>` children would "parse" as an empty
/// manifest. Check the root element by hand first.
fn check_root(document: &str) -> Result<()> {
    let mut reader = Reader::from_str(document);
    loop {
        match reader.read_event().or_raise(|| ErrorKind::Malformed)? {
            Event::Start(element) | Event::Empty(element) => {
                if element.local_name().as_ref() == ROOT {
                    return Ok(());
                }
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                exn::bail!(ErrorKind::MissingRoot(name));
            },
            Event::Eof => exn::bail!(ErrorKind::Malformed),
            // XML declaration, comments, doctype, whitespace.
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{DataKind, RepoMetadata};
    use crate::error::ErrorKind;
    use rstest::rstest;

    const CENTOS_7: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<repomd xmlns="http://linux.duke.edu/metadata/repo" xmlns:rpm="http://linux.duke.edu/metadata/rpm">
 <revision>1587512243</revision>
<data type="filelists">
  <checksum type="sha256">d6d94c7d406fe7ad4902a97104b39a0d8299451832a97f31d71653ba982c955b</checksum>
  <open-checksum type="sha256">9a0e1a2f8b7a2c5b1e3f2d0c4b6a8e7d9f1c3b5a7e9d2f4c6b8a0e1d3f5c7b9a</open-checksum>
  <location href="repodata/d6d94c7d406fe7ad4902a97104b39a0d8299451832a97f31d71653ba982c955b-filelists.xml.gz"/>
  <timestamp>1587512278</timestamp>
  <size>7333003</size>
  <open-size>106612356</open-size>
</data>
<data type="primary_db">
  <checksum type="sha256">3f3cdf3dee0ed5cc5b30f9ccec6d9ad8b1c2d5a19db3e1bd7a3efd9eb7e4e3ac</checksum>
  <open-checksum type="sha256">1b2d13d80da6ac5d4cc4df1c4c1b8bbd35b2c16e72c7b5d3a2e8f37cf7d8f1a2</open-checksum>
  <location href="repodata/3f3cdf3dee0ed5cc5b30f9ccec6d9ad8b1c2d5a19db3e1bd7a3efd9eb7e4e3ac-primary.sqlite.bz2"/>
  <timestamp>1587512312</timestamp>
  <database_version>10</database_version>
  <size>6614765</size>
  <open-size>31719424</open-size>
</data>
<data type="filelists_db">
  <checksum type="sha256">ee33b7d79e0aaa5cc7ea4e6e14f0f2c8cbd1e2b3c0cf8f0d5e0b0a8fd2f3c4d5</checksum>
  <open-checksum type="sha256">a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90</open-checksum>
  <location href="repodata/ee33b7d79e0aaa5cc7ea4e6e14f0f2c8cbd1e2b3c0cf8f0d5e0b0a8fd2f3c4d5-filelists.sqlite.bz2"/>
  <timestamp>1587512301</timestamp>
  <database_version>10</database_version>
  <size>7669620</size>
  <open-size>44457984</open-size>
</data>
<data type="group_gz">
  <checksum type="sha256">6bf9672d0862e8ef8b8ff05a2fd0208a922b1f5978e6589d87944c88259cb670</checksum>
  <open-checksum type="sha256">bce1c4a4ae3f8dd8d04d6b3e6e5f1d1cbd9e1d3a1a8d8a3d6f43fb0f7e3c0d0e</open-checksum>
  <location href="repodata/6bf9672d0862e8ef8b8ff05a2fd0208a922b1f5978e6589d87944c88259cb670-c7-x86_64-comps.xml.gz"/>
  <timestamp>1587512235.21</timestamp>
  <size>153491</size>
</data>
</repomd>
"#;

    #[test]
    fn test_parse_centos_manifest() {
        let repomd = RepoMetadata::parse(CENTOS_7).unwrap();
        assert_eq!(repomd.revision, Some(1587512243));
        assert_eq!(repomd.entries.len(), 4);

        let primary = repomd.find(&DataKind::PrimaryDb).unwrap();
        assert_eq!(
            primary.location.href,
            "repodata/3f3cdf3dee0ed5cc5b30f9ccec6d9ad8b1c2d5a19db3e1bd7a3efd9eb7e4e3ac-primary.sqlite.bz2"
        );
        assert_eq!(primary.database_version, Some(10));
        assert_eq!(primary.size, Some(6614765));
        assert_eq!(primary.open_size, Some(31719424));
        let checksum = primary.checksum.as_ref().unwrap();
        assert_eq!(checksum.kind, "sha256");
        assert_eq!(checksum.value, "3f3cdf3dee0ed5cc5b30f9ccec6d9ad8b1c2d5a19db3e1bd7a3efd9eb7e4e3ac");
        assert_eq!(primary.modified().unwrap().unix_timestamp(), 1587512312);

        let filelists = repomd.find(&DataKind::FilelistsDb).unwrap();
        assert!(filelists.location.href.ends_with("-filelists.sqlite.bz2"));
    }

    #[test]
    fn test_unknown_entries_are_retained() {
        let repomd: RepoMetadata = CENTOS_7.parse().unwrap();
        let kinds: Vec<_> = repomd.entries.iter().map(|e| e.kind.to_string()).collect();
        assert_eq!(kinds, ["filelists", "primary_db", "filelists_db", "group_gz"]);
        let group = &repomd.entries[3];
        assert_eq!(group.kind, DataKind::Other("group_gz".to_string()));
        assert_eq!(group.open_size, None);
        assert_eq!(group.timestamp, Some(1587512235.21));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let document = r#"<repomd xmlns="http://linux.duke.edu/metadata/repo">
            <revision>7</revision>
            <tags><content>binary-x86_64</content></tags>
            <data type="primary_db" future="yes">
                <location href="repodata/primary.sqlite.bz2" xml:base="http://elsewhere/"/>
                <header-size>1234</header-size>
            </data>
        </repomd>"#;
        let repomd = RepoMetadata::parse(document).unwrap();
        assert_eq!(repomd.revision, Some(7));
        assert_eq!(repomd.entries.len(), 1);
        assert_eq!(repomd.entries[0].location.href, "repodata/primary.sqlite.bz2");
        assert_eq!(repomd.entries[0].checksum, None);
    }

    #[test]
    fn test_first_entry_of_kind_wins() {
        let document = r#"<repomd>
            <data type="primary_db"><location href="first.sqlite.bz2"/></data>
            <data type="primary_db"><location href="second.sqlite.bz2"/></data>
        </repomd>"#;
        let repomd = RepoMetadata::parse(document).unwrap();
        assert_eq!(repomd.find(&DataKind::PrimaryDb).unwrap().location.href, "first.sqlite.bz2");
        assert!(repomd.find(&DataKind::FilelistsDb).is_none());
    }

    #[test]
    fn test_empty_manifest() {
        let repomd = RepoMetadata::parse("<repomd/>").unwrap();
        assert_eq!(repomd.revision, None);
        assert!(repomd.entries.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("<repomd><data type=\"primary_db\">")]
    #[case("<repomd><revision>not a number</revision></repomd>")]
    #[case("<repomd><data type=\"primary_db\"></data></repomd>")]
    #[case("definitely not xml")]
    fn test_malformed(#[case] document: &str) {
        let err = RepoMetadata::parse(document).unwrap_err();
        assert_eq!(*err, ErrorKind::Malformed);
    }

    #[rstest]
    #[case("<html><body>404 Not Found</body></html>", "html")]
    #[case("<?xml version=\"1.0\"?><metalink/>", "metalink")]
    fn test_missing_root(#[case] document: &str, #[case] root: &str) {
        let err = RepoMetadata::parse(document).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingRoot(root.to_string()));
    }
}
