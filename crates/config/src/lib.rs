//! Configuration for cnfdb.
//!
//! Values are layered, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. `cnfdb.toml` in the user's config directory.
//! 3. `cnfdb.toml` or `cnfdb.yaml` in the working directory.
//! 4. An explicit file passed to [`Loader::file`].
//! 5. `CNFDB_*` environment variables (`CNFDB_MIRROR`, `CNFDB_SCRATCH_DIR`, ...).
//! 6. Anything merged with [`Loader::merge`], typically command-line flags.

pub mod error;
mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use crate::loader::{ENV_PREFIX, FILE_STEM, Loader};

pub const DEFAULT_MIRROR: &str = "http://mirrors.sohu.com";
pub const DEFAULT_VERSION: &str = "7";
pub const DEFAULT_ARCH: &str = "x86_64";
pub const DEFAULT_REPO: &str = "os";
pub const DEFAULT_DIR: &str = "database";

/// How package names are resolved during the join.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// One query per package.
    #[default]
    Point,
    /// Load every package name into memory first.
    Preload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mirror root; the CentOS tree lives under `{mirror}/centos/`.
    pub mirror: String,
    /// Distribution release, e.g. `7`.
    pub version: String,
    /// `x86_64` or `i386`.
    pub arch: String,
    /// Repository name: `os`, `updates`, `extras`, `centosplus`...
    /// Also names the output file.
    pub repo: String,
    /// Where finished databases are published.
    pub dir: PathBuf,
    /// Direct repository URL, overriding `mirror`/`version`/`repo`/`arch`.
    pub repodata: Option<String>,
    /// Where downloaded metadata is decompressed. System temp if unset.
    pub scratch_dir: Option<PathBuf>,
    pub join: JoinMode,
    /// Abandon the whole run after this many seconds.
    pub deadline_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mirror: DEFAULT_MIRROR.to_string(),
            version: DEFAULT_VERSION.to_string(),
            arch: DEFAULT_ARCH.to_string(),
            repo: DEFAULT_REPO.to_string(),
            dir: PathBuf::from(DEFAULT_DIR),
            repodata: None,
            scratch_dir: None,
            join: JoinMode::default(),
            deadline_secs: None,
        }
    }
}

impl Config {
    /// The repository root: `repodata` if set, otherwise
    /// `{mirror}/centos/{version}/{repo}/{arch}`.
    pub fn base_url(&self) -> String {
        match &self.repodata {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "{}/centos/{}/{}/{}",
                self.mirror.trim_end_matches('/'),
                self.version,
                self.repo,
                self.arch
            ),
        }
    }

    /// File stem of the published database.
    pub fn output_name(&self) -> &str {
        &self.repo
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Check values that deserialized fine but can't be used.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.repo.is_empty() {
            return Err("repo must not be empty".to_string());
        }
        if self.repo.contains(['/', '\\']) || self.repo == "." || self.repo == ".." {
            return Err(format!("repo {:?} can't be used as a file name", self.repo));
        }
        match &self.repodata {
            Some(url) if url.trim().is_empty() => return Err("repodata must not be empty when set".to_string()),
            Some(_) => {},
            None => {
                if self.mirror.trim().is_empty() {
                    return Err("mirror must not be empty".to_string());
                }
                if self.version.is_empty() || self.arch.is_empty() {
                    return Err("version and arch must not be empty".to_string());
                }
            },
        }
        if self.deadline_secs == Some(0) {
            return Err("deadline must be at least one second".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_base_url() {
        assert_eq!(Config::default().base_url(), "http://mirrors.sohu.com/centos/7/os/x86_64");
        assert_eq!(Config::default().output_name(), "os");
    }

    #[test]
    fn test_repodata_overrides_base_url() {
        let config = Config {
            repodata: Some("https://vault.centos.org/7.9.2009/os/x86_64/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://vault.centos.org/7.9.2009/os/x86_64");
    }

    #[test]
    fn test_mirror_trailing_slash() {
        let config = Config {
            mirror: "http://mirror.example/".to_string(),
            repo: "extras".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://mirror.example/centos/7/extras/x86_64");
        assert_eq!(config.output_name(), "extras");
    }

    #[rstest]
    #[case::default(Config::default(), true)]
    #[case::empty_mirror(Config { mirror: String::new(), ..Default::default() }, false)]
    #[case::empty_mirror_with_repodata(
        Config { mirror: String::new(), repodata: Some("http://x/".to_string()), ..Default::default() },
        true
    )]
    #[case::blank_repodata(Config { repodata: Some(" ".to_string()), ..Default::default() }, false)]
    #[case::empty_repo(Config { repo: String::new(), ..Default::default() }, false)]
    #[case::nested_repo(Config { repo: "os/../../etc".to_string(), ..Default::default() }, false)]
    #[case::dot_repo(Config { repo: "..".to_string(), ..Default::default() }, false)]
    #[case::zero_deadline(Config { deadline_secs: Some(0), ..Default::default() }, false)]
    #[case::deadline(Config { deadline_secs: Some(600), ..Default::default() }, true)]
    fn test_validate(#[case] config: Config, #[case] valid: bool) {
        assert_eq!(config.validate().is_ok(), valid, "{:?}", config.validate());
    }

    #[test]
    fn test_deadline() {
        assert_eq!(Config::default().deadline(), None);
        let config = Config { deadline_secs: Some(90), ..Default::default() };
        assert_eq!(config.deadline(), Some(Duration::from_secs(90)));
    }
}
