//! Layered configuration loading with isolated XDG directories.

use crate::integration::test_utils::with_xdg_env;
use quizwheel::config::ConfigLoader;
use quizwheel::normalize::IdentityScheme;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_global(test_dir: &TempDir, contents: &str) {
    let dir = test_dir.path().join("quizwheel");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

#[test]
fn defaults_apply_without_any_file() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(config.wheel.duration_ms, 4000);
        assert_eq!(config.wheel.frame_interval_ms, 16);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.identity.scheme, IdentityScheme::Run);
        assert_eq!(config.logging.output, "stderr");

        let store = config.storage.resolve_path().unwrap();
        assert!(store.ends_with("store"), "unexpected store path {}", store.display());
    });
}

#[test]
fn explicit_file_overrides_global_file() {
    let test_dir = TempDir::new().unwrap();
    write_global(
        &test_dir,
        "[wheel]\nduration_ms = 1000\nframe_interval_ms = 20\n\n[identity]\nscheme = \"content\"\n",
    );
    let explicit = test_dir.path().join("explicit.toml");
    std::fs::write(&explicit, "[wheel]\nduration_ms = 2000\n").unwrap();

    with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load(Some(&explicit)).unwrap();
        assert_eq!(config.wheel.duration_ms, 2000);
        assert_eq!(config.wheel.frame_interval_ms, 20);
        assert_eq!(config.identity.scheme, IdentityScheme::Content);
    });
}

#[test]
fn environment_overrides_files() {
    let test_dir = TempDir::new().unwrap();
    write_global(&test_dir, "[storage]\npath = \"/from/file\"\n");

    with_xdg_env(&test_dir, || {
        std::env::set_var("QUIZWHEEL__STORAGE__PATH", "/from/env");
        let loaded = ConfigLoader::load(None);
        std::env::remove_var("QUIZWHEEL__STORAGE__PATH");

        assert_eq!(loaded.unwrap().storage.path, Some(PathBuf::from("/from/env")));
    });
}

#[test]
fn invalid_global_file_is_reported() {
    let test_dir = TempDir::new().unwrap();
    write_global(
        &test_dir,
        "[wheel]\nmin_extra_revolutions = 8\nmax_extra_revolutions = 3\n",
    );

    with_xdg_env(&test_dir, || {
        let err = ConfigLoader::load(None).unwrap_err();
        assert!(err.to_string().contains("min_extra_revolutions"));
    });
}
