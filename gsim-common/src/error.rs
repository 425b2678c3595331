use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GsimError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("Cache Error: {0}")]
    Cache(String),

    #[error("No bundle types found for platform '{0}'")]
    NoBundleForPlatform(String),

    #[error("Corrupt artifact '{0}': {1}")]
    CorruptArtifact(String, String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("Failed to start process: {0}")]
    ProcessStart(String),

    #[error("Failed to stop process: {0}")]
    ProcessStop(String),

    #[error("Process '{0}' failed: {1}")]
    ProcessFailed(String, String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for GsimError {
    fn from(err: std::io::Error) -> Self {
        GsimError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for GsimError {
    fn from(err: reqwest::Error) -> Self {
        GsimError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for GsimError {
    fn from(err: serde_json::Error) -> Self {
        GsimError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, GsimError>;
