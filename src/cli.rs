use clap::{ArgAction, Parser};
use serde::Serialize;
use std::path::PathBuf;

/// Build a command-not-found database (`cmdpkg(cmd, pkg, tips)`) from the
/// metadata of a CentOS-style RPM repository.
#[derive(Debug, Parser)]
#[command(name = "cnfdb", about, long_about = None, disable_version_flag = true)]
pub struct Args {
    /// Mirror of the package server.
    #[arg(long, value_name = "URL")]
    pub mirror: Option<String>,

    /// Version of the distribution.
    #[arg(long, value_name = "RELEASE")]
    pub version: Option<String>,

    /// Architecture of the distribution, x86_64 or i386.
    #[arg(long)]
    pub arch: Option<String>,

    /// Where the finished database is saved.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Repository: os, updates, extras, centosplus...
    #[arg(long)]
    pub repo: Option<String>,

    /// Repository URL, used instead of the mirror layout.
    #[arg(long, value_name = "URL")]
    pub repodata: Option<String>,

    /// Read configuration from this file as well.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How package names are resolved.
    #[arg(long, value_parser = ["point", "preload"])]
    pub join: Option<String>,

    /// Give up after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    pub deadline: Option<u64>,

    /// Print how long the run took.
    #[arg(long)]
    pub time: bool,

    /// More logging; repeat for even more.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Command-line values that override every other configuration source.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    mirror: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repodata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    join: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline_secs: Option<u64>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            mirror: self.mirror.clone(),
            version: self.version.clone(),
            arch: self.arch.clone(),
            dir: self.dir.clone(),
            repo: self.repo.clone(),
            repodata: self.repodata.clone(),
            join: self.join.clone(),
            deadline_secs: self.deadline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_distribution_version_flag() {
        let args = Args::try_parse_from(["cnfdb", "--version", "8", "--repo", "extras", "-vv"]).unwrap();
        assert_eq!(args.version.as_deref(), Some("8"));
        assert_eq!(args.repo.as_deref(), Some("extras"));
        assert_eq!(args.verbose, 2);
        assert!(!args.time);
    }

    #[test]
    fn test_unknown_join() {
        assert!(Args::try_parse_from(["cnfdb", "--join", "hash"]).is_err());
    }

    #[test]
    fn test_overrides_only_carry_given_flags() {
        let args = Args::try_parse_from(["cnfdb", "--arch", "i386", "--deadline", "30"]).unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.arch.as_deref(), Some("i386"));
        assert_eq!(overrides.deadline_secs, Some(30));
        assert!(overrides.mirror.is_none());
        assert!(overrides.repo.is_none());
    }
}
