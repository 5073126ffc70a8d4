//! HTTP source and aggregator against a live local server.

use crate::integration::test_utils::start_question_server;
use quizwheel::aggregate::{Aggregator, EndpointStatus};
use quizwheel::config::HttpConfig;
use quizwheel::error::ApiError;
use quizwheel::normalize::{normalize_questions, RunToken};
use quizwheel::source::{HttpQuestionSource, QuestionSource};
use serde_json::Value;
use std::sync::Arc;

fn http_source() -> Arc<HttpQuestionSource> {
    Arc::new(HttpQuestionSource::new(&HttpConfig::default()).unwrap())
}

#[tokio::test]
async fn fetch_sends_accept_json() {
    let (base, _) = start_question_server().await;
    let body = http_source().fetch(&format!("{base}/accept")).await.unwrap();
    assert_eq!(body[0]["title"], "accept-json=true");
}

#[tokio::test]
async fn fetch_reports_status_and_body_errors() {
    let (base, _) = start_question_server().await;
    let source = http_source();

    let err = source.fetch(&format!("{base}/broken")).await.unwrap_err();
    assert!(matches!(err, ApiError::SourceStatus { status: 500, .. }));

    let err = source.fetch(&format!("{base}/malformed")).await.unwrap_err();
    assert!(matches!(err, ApiError::SourceBody { .. }));

    let err = source.fetch("http://127.0.0.1:1/unreachable").await.unwrap_err();
    assert!(matches!(err, ApiError::SourceRequestFailed { .. }));
}

#[tokio::test]
async fn aggregator_merges_live_endpoints_in_order() {
    let (base, _) = start_question_server().await;
    let endpoints = vec![
        format!("{base}/wrapped"),
        format!("{base}/broken"),
        format!("{base}/array"),
        format!("{base}/malformed"),
        format!("{base}/object"),
    ];

    let report = Aggregator::new(http_source())
        .fetch_all_with_report(&endpoints)
        .await;

    let titles: Vec<Option<&str>> = report
        .records
        .iter()
        .map(|r| r.get("title").or_else(|| r.get("question")).and_then(Value::as_str))
        .collect();
    assert_eq!(
        titles,
        vec![Some("Wrapped one"), Some("Array one"), Some("Array two")]
    );
    assert_eq!(report.failed_count(), 2);
    assert!(!report.all_failed());
    assert_eq!(report.outcomes[0].status, EndpointStatus::Fetched { records: 1 });
    assert_eq!(report.outcomes[4].status, EndpointStatus::Unrecognized);
}

#[tokio::test]
async fn every_endpoint_failing_yields_nothing() {
    let (base, _) = start_question_server().await;
    let endpoints = vec![format!("{base}/broken"), format!("{base}/malformed")];
    let aggregator = Aggregator::new(http_source());

    assert!(aggregator.fetch_all(&endpoints).await.is_empty());
    assert!(aggregator.fetch_all_with_report(&endpoints).await.all_failed());
}

#[tokio::test]
async fn end_to_end_scenario_normalizes_both_records() {
    let (base, _) = start_question_server().await;
    let records = Aggregator::new(http_source())
        .fetch_all(&[format!("{base}/scenario")])
        .await;

    let questions = normalize_questions(&Value::Array(records), RunToken::next());
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].title, "Q1");
    assert_eq!(questions[0].description, "");
    assert_eq!(questions[1].title, "Q2");
    assert_eq!(questions[1].description, "A2");
    assert!(questions.iter().all(|q| !q.is_read));
    assert_ne!(questions[0].id, questions[1].id);
}
