//! Configuration loading for dcheck.
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables (see [`GeminiConfig::with_env_overrides`]).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::analysis::GeminiConfig;

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "dcheck.toml";

/// Errors from loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Gemini client settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// File the settings were read from (not part of the file format).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./dcheck.toml` and then the
    /// user config directory are tried, falling back to defaults. Environment
    /// overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(explicit, &Self::search_paths(), |key| std::env::var(key).ok())
    }

    /// Load configuration from an explicit path or the first existing
    /// candidate, then apply overrides from `lookup`.
    pub fn load_from<F>(
        explicit: Option<&Path>,
        candidates: &[PathBuf],
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => candidates.iter().find(|p| p.is_file()).cloned(),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.gemini = config.gemini.with_overrides_from(lookup);
        Ok(config)
    }

    /// Parse a config file without applying environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Default location in the user config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dcheck").join("config.toml"))
    }

    /// Config files tried in order when no path is given.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        paths.extend(Self::user_config_path());
        paths
    }
}
