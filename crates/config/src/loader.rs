use crate::Config;
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Provider;
use std::path::{Path, PathBuf};

/// Environment variables are read with this prefix, which is stripped.
pub const ENV_PREFIX: &str = "CNFDB_";
/// Config files are discovered as `{FILE_STEM}.toml` and `{FILE_STEM}.yaml`.
pub const FILE_STEM: &str = "cnfdb";

/// Builds a [`Config`] from layered sources. See the [crate](crate) docs for
/// the order.
#[derive(Debug)]
pub struct Loader {
    figment: Figment,
    explicit: Option<PathBuf>,
    overrides: Figment,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(dirs) = ProjectDirs::from("", "", FILE_STEM) {
            figment = figment.merge(Toml::file(dirs.config_dir().join(format!("{FILE_STEM}.toml"))));
        }
        figment = figment
            .merge(Toml::file(format!("{FILE_STEM}.toml")))
            .merge(Yaml::file(format!("{FILE_STEM}.yaml")));
        Self { figment, explicit: None, overrides: Figment::new() }
    }

    /// Also read `path`, which unlike the discovered files must exist. The
    /// format follows the extension; anything unrecognised is read as TOML.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.explicit = Some(path.as_ref().to_path_buf());
        self
    }

    /// Merge a provider on top of everything else.
    pub fn merge(mut self, provider: impl Provider) -> Self {
        self.overrides = self.overrides.merge(provider);
        self
    }

    #[tracing::instrument(skip(self), fields(explicit = ?self.explicit))]
    pub fn load(self) -> Result<Config> {
        let mut figment = self.figment;
        if let Some(path) = &self.explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.clone()));
            }
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(self.overrides)
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        if let Err(reason) = config.validate() {
            exn::bail!(ErrorKind::Invalid(reason));
        }
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}
