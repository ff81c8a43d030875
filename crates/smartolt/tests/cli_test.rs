//! Integration tests for the `smartolt` CLI binary.
//!
//! Argument parsing, help output, completions, and error exit codes run
//! without any server. The end-to-end cases point `--url` at a wiremock
//! server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `smartolt` binary with env isolation.
///
/// Clears all `SMARTOLT_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn smartolt_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("smartolt");
    cmd.env("HOME", "/tmp/smartolt-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/smartolt-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("SMARTOLT_PROFILE")
        .env_remove("SMARTOLT_URL")
        .env_remove("SMARTOLT_TOKEN")
        .env_remove("SMARTOLT_OUTPUT")
        .env_remove("SMARTOLT_INSECURE")
        .env_remove("SMARTOLT_TIMEOUT")
        .env_remove("SMARTOLT_DEFAULT_PROFILE");
    cmd
}

/// Same as [`smartolt_cmd`], aimed at a mock server.
fn api_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = smartolt_cmd();
    cmd.args(["--url", &format!("{}/api", server.uri()), "--token", "test-token"]);
    cmd
}

/// Run a command to completion off the async runtime.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = smartolt_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    smartolt_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("SmartOLT")
            .and(predicate::str::contains("onu"))
            .and(predicate::str::contains("odb"))
            .and(predicate::str::contains("speed-profiles")),
    );
}

#[test]
fn test_version_flag() {
    smartolt_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("smartolt"));
}

#[test]
fn test_onu_subcommands_exist() {
    smartolt_cmd().args(["onu", "--help"]).assert().success().stdout(
        predicate::str::contains("needs-reboot")
            .and(predicate::str::contains("authorize"))
            .and(predicate::str::contains("unconfigured"))
            .and(predicate::str::contains("speed")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    smartolt_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    smartolt_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    smartolt_cmd().arg("frobnicate").assert().code(2);
}

#[test]
fn test_invalid_output_format() {
    smartolt_cmd()
        .args(["-o", "xml", "odb", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("xml"));
}

#[test]
fn test_missing_config_is_usage_error() {
    let output = smartolt_cmd().args(["odb", "list"]).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("Configuration file not found"),
        "unexpected output:\n{text}"
    );
}

#[test]
fn test_url_without_token_is_auth_error() {
    smartolt_cmd()
        .args(["--url", "https://acme.smartolt.com/api", "odb", "list"])
        .assert()
        .code(3);
}

#[test]
fn test_unconfigured_rejects_non_numeric_olt() {
    smartolt_cmd()
        .args([
            "--url",
            "http://127.0.0.1:9/api",
            "--token",
            "t",
            "onu",
            "unconfigured",
            "olt-one",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_reboot_requires_yes_without_terminal() {
    let output = smartolt_cmd()
        .args([
            "--url",
            "http://127.0.0.1:9/api",
            "--token",
            "t",
            "onu",
            "reboot",
            "HWTC1",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("requires confirmation"));
}

// ── End to end against a mock server ────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_odb_availability_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/system/get_odbs"))
        .and(header("X-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "response": [
                { "id": "2", "name": "test odb", "zone_id": "1", "ports": "8" },
                { "id": "3", "name": "test odb2", "zone_id": "1", "ports": "16" }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/onu/get_all_onus_details"))
        .and(header("X-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "onus": [
                { "unique_external_id": "a", "odb_name": "test odb" },
                { "unique_external_id": "b", "odb_name": "Test ODB2 " },
                { "unique_external_id": "c", "odb_name": "test odb2" }
            ]
        })))
        .mount(&server)
        .await;

    let mut cmd = api_cmd(&server);
    cmd.args(["-o", "json", "odb", "availability"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report,
        json!([
            { "odb_id": "2", "odb_name": "test odb", "total_ports": 8, "used_ports": 1, "available_ports": 7 },
            { "odb_id": "3", "odb_name": "test odb2", "total_ports": 16, "used_ports": 2, "available_ports": 14 }
        ])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_needs_reboot_plain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/onu/get_onu_statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "response": [
                { "id": "old", "status": "Online", "last_status_change": "2020-01-01 00:00:00" },
                { "id": "down", "status": "Offline", "last_status_change": "2020-01-01 00:00:00" },
                { "id": "garbled", "status": "Online", "last_status_change": "yesterday" }
            ]
        })))
        .mount(&server)
        .await;

    let mut cmd = api_cmd(&server);
    cmd.args(["-o", "plain", "onu", "needs-reboot"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "old");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_needs_reboot_huge_threshold_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/onu/get_onu_statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "response": [
                { "id": "old", "status": "Online", "last_status_change": "2020-01-01 00:00:00" }
            ]
        })))
        .mount(&server)
        .await;

    let mut cmd = api_cmd(&server);
    cmd.args(["-o", "json", "onu", "needs-reboot", "--days", "100000000"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let ids: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ids, json!([]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_service_message_reaches_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/onu/update_onu_speed_profiles/HWTC1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": false,
            "error": "No such Download speed profile exists"
        })))
        .mount(&server)
        .await;

    let mut cmd = api_cmd(&server);
    cmd.args(["onu", "speed", "HWTC1", "--download", "nope", "--upload", "10M"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No such Download speed profile exists"),
        "unexpected output:\n{text}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/system/get_speed_profiles"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": "Invalid token" })),
        )
        .mount(&server)
        .await;

    let mut cmd = api_cmd(&server);
    cmd.arg("speed-profiles");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reboot_with_yes_posts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/onu/reboot/HWTC1"))
        .and(header("X-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = api_cmd(&server);
    cmd.args(["--yes", "onu", "reboot", "HWTC1"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
}

// ── Config ──────────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
#[test]
fn test_config_show_redacts_token() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("smartolt");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        r#"
default_profile = "acme"

[profiles.acme]
base_url = "https://acme.smartolt.com/api"
token = "super-secret-token"
"#,
    )
    .unwrap();

    let output = smartolt_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[profiles.acme]"), "{stdout}");
    assert!(!stdout.contains("super-secret-token"), "{stdout}");
}
