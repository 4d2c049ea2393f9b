use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::catalog::DEFAULT_API_URL;
use crate::error::ConfigError;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/200";

const APP_DIR: &str = "hogwarts";

/// Resolve the data directory based on priority:
/// 1. HOGWARTS_DATA_DIR environment variable
/// 2. XDG data directory
/// 3. ~/.hogwarts (fallback for systems without XDG)
pub fn resolve_data_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(env_path) = std::env::var("HOGWARTS_DATA_DIR") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join(APP_DIR));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".hogwarts"));
    }

    Err(ConfigError::NoDataDir)
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint returning the JSON character array
    pub api_url: String,
    /// SQLite file holding persisted favorites
    pub storage_path: Option<PathBuf>,
    /// Number of catalog entries shown when no filter is active
    pub page_size: usize,
    /// Image shown for entities without one
    pub placeholder_image: String,
    /// Log file used while the terminal UI owns the screen
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            log_path: None,
        }
    }
}

impl Config {
    /// Load from an explicit path, HOGWARTS_CONFIG, or the default location.
    /// An explicit path must exist; otherwise a missing file yields defaults.
    /// HOGWARTS_API_URL overrides `api_url`.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                warn!(path = %path.display(), "explicit config file not found");
                return Err(ConfigError::Missing {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => Some(path.to_path_buf()),
            None => match std::env::var("HOGWARTS_CONFIG") {
                Ok(env_path) => Some(expand_tilde(&env_path)),
                Err(_) => Self::default_path(),
            },
        };

        let mut config = match path {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("HOGWARTS_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        if config.page_size == 0 {
            config.page_size = DEFAULT_PAGE_SIZE;
        }
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    pub fn storage_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => Ok(resolve_data_dir()?.join("storage.db")),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_path {
            Some(path) => Ok(path.clone()),
            None => Ok(resolve_data_dir()?.join("hogwarts.log")),
        }
    }
}
