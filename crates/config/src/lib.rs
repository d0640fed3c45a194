//! Layered configuration for pylookup.
//!
//! Values are merged in order, later sources winning:
//! 1. built-in defaults,
//! 2. `config.toml` in the platform config directory, or an explicit file
//!    (TOML, YAML or JSON, chosen by extension),
//! 3. `PYLOOKUP_*` environment variables,
//! 4. [`Overrides`] from the command line.

pub mod error;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ErrorKind, Result};

pub const ENV_PREFIX: &str = "PYLOOKUP_";
pub const DEFAULT_DATABASE: &str = "pylookup.db";
pub const DEFAULT_INDEX_FILE: &str = "genindex-all.html";
const CONFIG_FILE: &str = "config.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "python", "pylookup")
}

/// Default location of the configuration file, if the platform has one.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the entry store.
    pub database: PathBuf,
    /// File name appended to directory and URL sources when updating.
    pub index_file: String,
    /// Timeout for fetching remote index pages, in seconds.
    pub fetch_timeout: u64,
    pub case_sensitive: bool,
    /// Entries buffered between the parser and the store during an update.
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: project_dirs()
                .map(|dirs| dirs.data_dir().join(DEFAULT_DATABASE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            fetch_timeout: 30,
            case_sensitive: false,
            channel_capacity: 256,
        }
    }
}

/// Values given on the command line. Unset fields leave the configured value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

impl Config {
    /// Load and validate configuration from every layer.
    ///
    /// A missing default config file is fine; a missing `explicit` file is
    /// an error.
    pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let config: Self = Self::figment(explicit)?
            .merge(Serialized::defaults(overrides))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Defaults, file and environment layers, without command-line overrides.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match explicit {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
                }
                match path.extension().and_then(|ext| ext.to_str()) {
                    Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                    Some("json") => figment.merge(Json::file(path)),
                    _ => figment.merge(Toml::file(path)),
                }
            },
            None => match default_config_file() {
                Some(path) => figment.merge(Toml::file(path)),
                None => figment,
            },
        };
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.index_file.trim().is_empty() {
            exn::bail!(ErrorKind::InvalidValue { field: "index_file", value: self.index_file.clone() });
        }
        if self.fetch_timeout == 0 {
            exn::bail!(ErrorKind::InvalidValue { field: "fetch_timeout", value: "0".to_string() });
        }
        if self.channel_capacity == 0 {
            exn::bail!(ErrorKind::InvalidValue { field: "channel_capacity", value: "0".to_string() });
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout)
    }
}
