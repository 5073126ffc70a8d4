//! Aggregator
//!
//! Fans out to every configured endpoint concurrently and merges what comes back. The merge
//! is best effort: an endpoint that fails contributes nothing and never fails the whole
//! aggregate.

use crate::source::{extract_records, QuestionSource};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// What one endpoint contributed to a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EndpointStatus {
    Fetched { records: usize },
    /// Answered successfully with a body that holds no recognizable record array.
    Unrecognized,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointOutcome {
    pub endpoint: String,
    #[serde(flatten)]
    pub status: EndpointStatus,
}

/// Merged records plus the per-endpoint outcomes that produced them.
#[derive(Debug, Clone, Default)]
pub struct AggregateReport {
    pub records: Vec<Value>,
    pub outcomes: Vec<EndpointOutcome>,
}

impl AggregateReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, EndpointStatus::Failed { .. }))
            .count()
    }

    /// True when at least one endpoint was tried and none of them answered.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.failed_count() == self.outcomes.len()
    }
}

#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn QuestionSource>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self { source }
    }

    /// Raw records from all endpoints, concatenated in configured order.
    pub async fn fetch_all(&self, endpoints: &[String]) -> Vec<Value> {
        self.fetch_all_with_report(endpoints).await.records
    }

    pub async fn fetch_all_with_report(&self, endpoints: &[String]) -> AggregateReport {
        if endpoints.is_empty() {
            return AggregateReport::default();
        }

        let fetches = endpoints.iter().map(|endpoint| {
            let source = Arc::clone(&self.source);
            async move { source.fetch(endpoint).await }
        });
        // join_all keeps input order and waits for every endpoint, failed or not.
        let results = join_all(fetches).await;

        let mut report = AggregateReport::default();
        for (endpoint, result) in endpoints.iter().zip(results) {
            let status = match result {
                Ok(body) => match extract_records(body) {
                    Some(records) => {
                        debug!(endpoint = %endpoint, records = records.len(), "endpoint fetched");
                        let count = records.len();
                        report.records.extend(records);
                        EndpointStatus::Fetched { records: count }
                    }
                    None => {
                        debug!(endpoint = %endpoint, "endpoint body has no record array");
                        EndpointStatus::Unrecognized
                    }
                },
                Err(err) => {
                    warn!(endpoint = %endpoint, error = %err, "endpoint fetch failed; skipping");
                    EndpointStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            report.outcomes.push(EndpointOutcome {
                endpoint: endpoint.clone(),
                status,
            });
        }
        report
    }
}
