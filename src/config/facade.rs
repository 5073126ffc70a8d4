//! Config loading facade: assembles sources in precedence order and validates the result.

use crate::config::merge::merge_policy;
use crate::config::sources::{env, global_file};
use crate::config::QuizConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration: defaults, global file, optional explicit file, environment.
    pub fn load(explicit: Option<&Path>) -> Result<QuizConfig, ApiError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApiError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = env::add_to_builder(builder);

        let config: QuizConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load configuration from a single file (plus defaults and environment), skipping the
    /// global file.
    pub fn load_from_file(path: &Path) -> Result<QuizConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let config: QuizConfig = env::add_to_builder(builder).build()?.try_deserialize()?;
        Self::validated(config)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn validated(config: QuizConfig) -> Result<QuizConfig, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        debug!(identity = ?config.identity.scheme, "configuration loaded");
        Ok(config)
    }
}
