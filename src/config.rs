use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LAUNCHES_URL: &str = "https://api.spacexdata.com/v3/launches?launch_year=2020";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration, read from `config.json` in the platform config dir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Launch list URL. The stock value is the 2020 listing.
    pub endpoint: String,
    /// No timeout unless set.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    /// Fallback filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: LAUNCHES_URL.to_string(),
            request_timeout_secs: None,
            user_agent: format!("launch-explorer/{}", env!("CARGO_PKG_VERSION")),
            log_level: "info".to_string(),
            tick_rate_ms: 100,
        }
    }
}

pub fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
    directories::ProjectDirs::from("com", "spacexdata", "launch-explorer")
        .ok_or(ConfigError::NoHomeDirectory)
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(project_dirs()?.config_dir().join("config.json"))
    }

    /// Load from `path` if given (it must exist), else from the default
    /// location if a file is there, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load_default(Self::default_path()),
        }
    }

    fn load_default(default_path: Result<PathBuf, ConfigError>) -> Result<Self, ConfigError> {
        match default_path {
            Ok(path) if path.exists() => Self::from_file(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::warn!("no config location ({e}), using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn tick_rate(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_rate_ms.max(10))
    }
}
