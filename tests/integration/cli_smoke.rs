//! End-to-end runs of the quizwheel binary against a local question server.

use crate::integration::test_utils::start_question_server;
use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(test_dir: &Path, args: &[&str]) -> Output {
    let home = test_dir.join("home");
    std::fs::create_dir_all(&home).unwrap();
    Command::new(env!("CARGO_BIN_EXE_quizwheel"))
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", test_dir.join("config"))
        .env("XDG_DATA_HOME", test_dir.join("data"))
        .env_remove("QUIZWHEEL_LOG")
        .arg("--store")
        .arg(test_dir.join("store"))
        .args(args)
        .output()
        .unwrap()
}

fn run_ok(test_dir: &Path, args: &[&str]) -> String {
    let output = run(test_dir, args);
    assert!(
        output.status.success(),
        "quizwheel {:?} failed: stderr={}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn listed(test_dir: &Path, extra: &[&str]) -> Vec<Value> {
    let mut args = vec!["list", "--format", "json"];
    args.extend_from_slice(extra);
    let body: Value = serde_json::from_str(&run_ok(test_dir, &args)).unwrap();
    body["questions"].as_array().cloned().unwrap_or_default()
}

#[test]
fn fresh_store_has_no_endpoints_and_nothing_to_spin() {
    let test_dir = TempDir::new().unwrap();

    let shown = run_ok(test_dir.path(), &["endpoints", "show"]);
    assert!(shown.contains("No endpoints configured"));

    let spun = run_ok(test_dir.path(), &["spin", "--quick"]);
    assert!(spun.contains("No questions loaded"));

    let config = run_ok(test_dir.path(), &["config", "show"]);
    assert!(config.contains("[wheel]"));
    assert!(config.contains("duration_ms = 4000"));
}

#[test]
fn default_run_keeps_stderr_free_of_logs() {
    let test_dir = TempDir::new().unwrap();
    let output = run(test_dir.path(), &["endpoints", "show"]);
    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "stderr={}", String::from_utf8_lossy(&output.stderr));

    let verbose = run(test_dir.path(), &["--verbose", "endpoints", "show"]);
    assert!(String::from_utf8_lossy(&verbose.stderr).contains("command started"));
}

#[tokio::test]
async fn set_list_spin_clear_round() {
    let (base, _) = start_question_server().await;
    let test_dir = TempDir::new().unwrap();
    let dir = test_dir.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        let scenario = format!("{base}/scenario");
        let saved = run_ok(&dir, &["endpoints", "set", &scenario]);
        assert!(saved.contains("Saved 1 endpoint(s)"), "{saved}");
        assert!(saved.contains("Fetched 2 questions"), "{saved}");

        let questions = listed(&dir, &[]);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0]["title"], "Q1");
        assert_eq!(questions[1]["description"], "A2");

        let picked = run_ok(&dir, &["spin", "--seed", "7", "--quick"]);
        assert!(picked.contains("Picked"), "{picked}");
        assert!(picked.contains("1 unread left"), "{picked}");
        assert_eq!(listed(&dir, &["--unread"]).len(), 1);

        run_ok(&dir, &["spin", "--quick"]);
        let done = run_ok(&dir, &["spin", "--quick"]);
        assert!(done.contains("Every question has been read"), "{done}");

        let cleared = run_ok(&dir, &["clear", "--yes"]);
        assert!(cleared.contains("Questions cleared"));

        let shown = run_ok(&dir, &["endpoints", "show", "--format", "json"]);
        let body: Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(body["endpoints"][0], Value::String(scenario));
    })
    .await
    .unwrap();
}
