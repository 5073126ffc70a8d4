//! Shared test utilities for integration tests
//!
//! Centralizes XDG isolation and the canned JSON question server so tests stay consistent.

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Global mutex to serialize XDG environment variable access across all tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
    xdg_data_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
            xdg_data_home: std::env::var("XDG_DATA_HOME").ok(),
        }
    }

    fn restore(self) {
        restore_var("HOME", self.home);
        restore_var("XDG_CONFIG_HOME", self.xdg_config_home);
        restore_var("XDG_DATA_HOME", self.xdg_data_home);
    }
}

fn restore_var(key: &str, value: Option<String>) {
    match value {
        Some(orig) => std::env::set_var(key, orig),
        None => std::env::remove_var(key),
    }
}

/// Run `f` with HOME, XDG_CONFIG_HOME, and XDG_DATA_HOME pointed into `test_dir`.
///
/// The global config file then lives at `<test_dir>/quizwheel/config.toml`.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_data_home = test_dir.path().join("data");
    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_data_home).unwrap();
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().to_str().unwrap());
    std::env::set_var("XDG_DATA_HOME", test_data_home.to_str().unwrap());

    let result = f();

    env_state.restore();

    result
}

/// Canned question server. Routes:
/// - `/array`: bare array
/// - `/wrapped`: records under `results`
/// - `/scenario`: the two-record mixed-shape example
/// - `/object`: JSON object without a recognized wrapper
/// - `/broken`: 500
/// - `/malformed`: 200 with a body that is not JSON
/// - `/accept`: echoes whether the request asked for JSON
pub fn question_router(hits: Arc<AtomicUsize>) -> Router {
    let counted = hits.clone();
    Router::new()
        .route(
            "/array",
            get(move || {
                counted.fetch_add(1, Ordering::SeqCst);
                async {
                    Json(json!([
                        { "id": "a", "title": "Array one", "description": "first" },
                        { "id": "b", "title": "Array two", "isRead": true }
                    ]))
                }
            }),
        )
        .route(
            "/wrapped",
            get(|| async {
                Json(json!({ "results": [{ "_id": 10, "question": "Wrapped one" }] }))
            }),
        )
        .route(
            "/scenario",
            get(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                async {
                    Json(json!([
                        { "question": "Q1" },
                        { "id": 7, "text": "Q2", "answer": "A2" }
                    ]))
                }
            }),
        )
        .route(
            "/object",
            get(|| async { Json(json!({ "rows": [{ "title": "hidden" }] })) }),
        )
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/malformed",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{not json") }),
        )
        .route(
            "/accept",
            get(|headers: HeaderMap| async move {
                let accepts_json = headers
                    .get(header::ACCEPT)
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v == "application/json")
                    .unwrap_or(false);
                Json(json!([{ "title": format!("accept-json={}", accepts_json) }]))
            }),
        )
}

/// Bind to port 0 and return the base URL.
pub async fn start_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Start the canned question server and return its base URL plus the hit counter for
/// `/array` and `/scenario`.
pub async fn start_question_server() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = start_server(question_router(hits.clone())).await;
    (base, hits)
}
