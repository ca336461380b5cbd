//! Error types for the gateway components.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// Failure while downloading an asset to disk.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to download {url}: {source}")]
    Transfer {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProvisionError {
    pub(crate) fn transfer(url: &str, source: reqwest::Error) -> Self {
        Self::Transfer {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a single extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error("Error: failed to launch {}: {source}", binary.display())]
    Launch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error: command failed ({status}): {stderr}")]
    Exit { status: ExitStatus, stderr: String },

    #[error("Stderr: {0}")]
    Stderr(String),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Error: extraction timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of an image proxy fetch.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("missing image url")]
    MissingUrl,
}
