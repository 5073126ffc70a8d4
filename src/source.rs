//! Question Sources
//!
//! A source answers one endpoint with one JSON body. The HTTP source is the production
//! implementation; anything implementing [`QuestionSource`] can stand in for it.

use crate::config::HttpConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Wrapper keys recognized around a record array, in priority order.
pub const WRAPPER_KEYS: [&str; 4] = ["data", "questions", "results", "items"];

const ACCEPT_JSON: &str = "application/json";

/// Source client trait
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the raw JSON body served at `endpoint`.
    ///
    /// Non-success statuses, transport failures, and bodies that are not JSON are errors.
    async fn fetch(&self, endpoint: &str) -> Result<Value, ApiError>;
}

/// Pull the record array out of a response body.
///
/// Accepts a bare array or an object carrying an array under one of [`WRAPPER_KEYS`].
/// Any other shape yields `None`.
pub fn extract_records(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => {
            let key = WRAPPER_KEYS
                .iter()
                .find(|key| matches!(map.get(**key), Some(Value::Array(_))))?;
            match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }
        }
        _ => None,
    }
}

fn map_http_error(endpoint: &str, error: reqwest::Error) -> ApiError {
    let message = if error.is_timeout() {
        format!("Request timeout: {}", error)
    } else if error.is_connect() {
        format!("Connection error: {}", error)
    } else {
        format!("HTTP error: {}", error)
    };
    ApiError::SourceRequestFailed {
        endpoint: endpoint.to_string(),
        message,
    }
}

/// HTTP question source
pub struct HttpQuestionSource {
    client: Client,
}

impl HttpQuestionSource {
    pub fn new(config: &HttpConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("quizwheel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::HttpClient(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch(&self, endpoint: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(endpoint)
            .header(ACCEPT, ACCEPT_JSON)
            .send()
            .await
            .map_err(|e| map_http_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::SourceStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| ApiError::SourceBody {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}
