//! Error types for the quizwheel question store, sources, and session.

use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Failed to (de)serialize stored record: {0}")]
    Serialization(String),

    #[error("Duplicate question id in replacement set: {0}")]
    DuplicateQuestionId(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        match err {
            sled::Error::Io(io) => StorageError::IoError(io),
            other => StorageError::Backend(other.to_string()),
        }
    }
}

/// Errors surfaced by the session, sources, and configuration layers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Request to {endpoint} failed: {message}")]
    SourceRequestFailed { endpoint: String, message: String },

    #[error("Source {endpoint} answered with status {status}")]
    SourceStatus { endpoint: String, status: u16 },

    #[error("Source {endpoint} returned an unreadable body: {message}")]
    SourceBody { endpoint: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load questions: {0}")]
    LoadFailed(String),

    #[error("Failed to save endpoints: {0}")]
    SettingsSave(String),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
