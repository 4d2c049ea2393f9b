//! Typed errors for the library. Binaries wrap these in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain the catalog from the remote API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("catalog body is not a JSON array of characters: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reading or writing the durable key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure in {context}: {source}")]
    Sqlite {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("could not create storage directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize favorites: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} does not exist")]
    Missing { path: PathBuf },

    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config {path} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not determine a data directory: no HOME or XDG data directory found")]
    NoDataDir,
}
