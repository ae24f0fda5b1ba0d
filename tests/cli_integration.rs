//! CLI integration tests
//!
//! End-to-end tests for the `sogum` binary using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the sogum binary for testing
fn sogum_cmd() -> Command {
    let mut cmd = Command::cargo_bin("sogum").unwrap();
    cmd.env_remove("SOGUM_PORT").env_remove("SOGUM_RELAY_URL");
    cmd
}

/// Config with one service on a closed port and short deadlines.
fn write_closed_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("sogum.toml");
    std::fs::write(
        &path,
        r#"
[health_check]
timeout_ms = 300
probe_timeout_ms = 300
host = "127.0.0.1"

[[services]]
id = "ocr"
name = "OCR Service"
port = 1
"#,
    )
    .unwrap();
    path
}

#[test]
fn test_version_output() {
    sogum_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sogum"));
}

#[test]
fn test_help_shows_all_commands() {
    sogum_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("test"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_serve_help() {
    sogum_cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--no-health-check"));
}

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("sogum.toml");

    sogum_cmd()
        .args(["config", "init", "-o", config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[server]"));
    assert!(content.contains("[[services]]"));
}

#[test]
fn test_config_init_no_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("sogum.toml");
    std::fs::write(&config_path, "existing content").unwrap();

    sogum_cmd()
        .args(["config", "init", "-o", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert_eq!(content, "existing content");
}

#[test]
fn test_status_json_reports_offline_service() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_closed_config(&temp_dir);

    let output = sogum_cmd()
        .args(["status", "--json", "-c", config_path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let body: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(body["services"][0]["id"], "ocr");
    assert_eq!(body["services"][0]["status"]["state"], "offline");
    assert_eq!(body["summary"]["status"], "offline");
}

#[test]
fn test_status_table_output() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_closed_config(&temp_dir);

    sogum_cmd()
        .args(["status", "-c", config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OCR Service"))
        .stdout(predicate::str::contains("0/1 online"));
}

#[test]
fn test_test_unknown_service_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_closed_config(&temp_dir);

    sogum_cmd()
        .args(["test", "missing", "-c", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("service not found: missing"));
}

#[test]
fn test_test_unreachable_service_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_closed_config(&temp_dir);

    sogum_cmd()
        .args(["test", "ocr", "-c", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("test failed"));
}

#[test]
fn test_invalid_config_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("sogum.toml");
    std::fs::write(&config_path, "[relay]\nbackend_host = \"localhost:11434\"").unwrap();

    sogum_cmd()
        .args(["status", "-c", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("relay.backend_host"));
}

#[test]
fn test_ask_unreachable_relay_prints_fallback() {
    sogum_cmd()
        .args(["ask", "hello", "--url", "http://127.0.0.1:1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sorry,"));
}

#[test]
fn test_completions_bash() {
    sogum_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sogum"));
}
