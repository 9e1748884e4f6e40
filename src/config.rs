//! Runtime configuration.
//!
//! Everything here has a sensible default, so the config file is optional.

use crate::archive::ArchiveFormat;
use crate::reference;
use failure::{Error, ResultExt};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub archive: ArchivePrefs,
}

impl Config {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let raw = fs::read_to_string(path.as_ref()).context("Unable to read the config file")?;
        let cfg = toml::from_str(&raw).context("The config file isn't valid TOML")?;

        Ok(cfg)
    }

    /// Load `path` if it exists, otherwise use the defaults.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        if path.as_ref().exists() {
            Config::from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn example() -> Config {
        Config::default()
    }

    pub fn as_toml(&self) -> Result<String, Error> {
        let serialized =
            toml::to_string_pretty(self).context("Unable to serialize the config")?;

        Ok(serialized)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// The user agent sent with every request.
    pub user_agent: String,
    /// How long to wait for a request before giving up, in seconds.
    pub timeout_seconds: u64,
}

impl NetworkConfig {
    pub const DEFAULT_AGENT: &'static str = concat!("repo-fetch/", env!("CARGO_PKG_VERSION"));
}

impl Default for NetworkConfig {
    fn default() -> NetworkConfig {
        NetworkConfig {
            user_agent: NetworkConfig::DEFAULT_AGENT.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchivePrefs {
    /// The branch assumed when a provider doesn't report one.
    pub default_branch: String,
    /// The format used where a provider offers a choice (GitHub branch
    /// downloads, Codeberg).
    pub fallback_format: ArchiveFormat,
    /// Ask Codeberg for tarballs regardless of `fallback_format`.
    pub codeberg_prefer_tar_gz: bool,
}

impl Default for ArchivePrefs {
    fn default() -> ArchivePrefs {
        ArchivePrefs {
            default_branch: reference::DEFAULT_BRANCH.to_string(),
            fallback_format: ArchiveFormat::Zip,
            codeberg_prefer_tar_gz: false,
        }
    }
}
