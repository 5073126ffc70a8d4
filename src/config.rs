//! Configuration System
//!
//! Layered configuration: built-in defaults, the global user file, an optional explicit
//! file, then `QUIZWHEEL__`-prefixed environment variables. Validated before use.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::normalize::IdentityScheme;
use crate::wheel::SpinSettings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

const APP_NAME: &str = "quizwheel";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub wheel: WheelConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the durable store lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory. Defaults to `<platform data dir>/quizwheel/store`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the store directory, falling back to the platform data directory.
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_dir().join("store"))
            .ok_or_else(|| {
                ApiError::ConfigError(
                    "Cannot determine a data directory; set storage.path".to_string(),
                )
            })
    }
}

/// HTTP client settings for question sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Spin timing and energy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// Progress sampling period (one display refresh)
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    #[serde(default = "default_min_extra_revolutions")]
    pub min_extra_revolutions: u32,

    #[serde(default = "default_max_extra_revolutions")]
    pub max_extra_revolutions: u32,
}

fn default_duration_ms() -> u64 {
    4000
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_min_extra_revolutions() -> u32 {
    4
}

fn default_max_extra_revolutions() -> u32 {
    6
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            min_extra_revolutions: default_min_extra_revolutions(),
            max_extra_revolutions: default_max_extra_revolutions(),
        }
    }
}

impl WheelConfig {
    pub fn spin_settings(&self) -> SpinSettings {
        SpinSettings {
            duration: Duration::from_millis(self.duration_ms),
            min_extra_revolutions: self.min_extra_revolutions,
            max_extra_revolutions: self.max_extra_revolutions,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.frame_interval_ms == 0 {
            return Err("frame_interval_ms must be greater than zero".to_string());
        }
        if self.min_extra_revolutions < 2 {
            return Err("min_extra_revolutions must be at least 2".to_string());
        }
        if self.min_extra_revolutions > self.max_extra_revolutions {
            return Err(format!(
                "min_extra_revolutions ({}) exceeds max_extra_revolutions ({})",
                self.min_extra_revolutions, self.max_extra_revolutions
            ));
        }
        Ok(())
    }
}

/// Question identity derivation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub scheme: IdentityScheme,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Storage(String),
    Http(String),
    Wheel(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "storage: {}", msg),
            ValidationError::Http(msg) => write!(f, "http: {}", msg),
            ValidationError::Wheel(msg) => write!(f, "wheel: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl QuizConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::Storage("path cannot be empty".to_string()));
            }
        }

        if self.http.request_timeout_secs == 0 {
            errors.push(ValidationError::Http(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Err(e) = self.wheel.validate() {
            errors.push(ValidationError::Wheel(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
