//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::SettingsSave(_) => format!("{} (endpoints unchanged)", e),
        ApiError::LoadFailed(_) => format!("{} (run `quizwheel refresh` to retry)", e),
        _ => e.to_string(),
    }
}
