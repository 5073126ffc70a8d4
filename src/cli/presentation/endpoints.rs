//! Endpoint list formatters.

use crate::cli::presentation::shared::{format_section_heading, to_pretty_json};
use crate::error::ApiError;
use serde_json::json;

pub fn format_endpoints_text(endpoints: &[String]) -> String {
    if endpoints.is_empty() {
        return "No endpoints configured. Add some with `quizwheel endpoints set <URL>...`"
            .to_string();
    }
    let mut out = format!("{}\n", format_section_heading("Endpoints"));
    for (i, endpoint) in endpoints.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, endpoint));
    }
    out.trim_end().to_string()
}

pub fn format_endpoints_json(endpoints: &[String]) -> Result<String, ApiError> {
    to_pretty_json(&json!({
        "endpoints": endpoints,
        "total": endpoints.len(),
    }))
}
