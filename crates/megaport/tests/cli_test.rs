//! Integration tests for the `megaport` CLI binary.
//!
//! Argument parsing, help output and completions run offline; the
//! provider-bound commands run against a wiremock server passed in with
//! `--endpoint`.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `megaport` binary with env isolation.
///
/// Clears all `MEGAPORT_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn megaport_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("megaport");
    cmd.env("HOME", "/tmp/megaport-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/megaport-cli-test-nonexistent")
        .env_remove("MEGAPORT_PROFILE")
        .env_remove("MEGAPORT_ENDPOINT")
        .env_remove("MEGAPORT_TOKEN")
        .env_remove("MEGAPORT_OUTPUT")
        .env_remove("MEGAPORT_TIMEOUT")
        .env_remove("MEGAPORT_USERNAME")
        .env_remove("MEGAPORT_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "message": "ok", "data": data })
}

/// A command aimed at `server` with a fixed token.
fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = megaport_cmd();
    cmd.args(["--endpoint", &server.uri(), "--token", "tok-test"]);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = megaport_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    megaport_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("token")
            .and(predicate::str::contains("locations"))
            .and(predicate::str::contains("partner-ports"))
            .and(predicate::str::contains("vlan"))
            .and(predicate::str::contains("delete")),
    );
}

#[test]
fn test_version_flag() {
    megaport_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("megaport"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    megaport_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    megaport_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Offline errors ──────────────────────────────────────────────────

#[test]
fn test_invalid_output_format() {
    let output = megaport_cmd()
        .args(["--output", "invalid", "locations"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_vlan_out_of_range_is_usage_error() {
    megaport_cmd()
        .args(["vlan", "check", "port-a", "5000"])
        .assert()
        .code(2);
}

#[test]
fn test_reset_without_token_is_auth_error() {
    megaport_cmd()
        .args(["token", "--reset"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("MEGAPORT_TOKEN"));
}

#[test]
fn test_delete_requires_yes_without_terminal() {
    megaport_cmd()
        .args(["--endpoint", "http://127.0.0.1:9", "delete", "vxc-1"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

#[test]
fn test_config_path() {
    megaport_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Against a mock provider ─────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_locations_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/locations"))
        .and(header("X-Auth-Token", "tok-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"id": 3, "name": "Equinix SY1", "country": "Australia", "status": "Active"},
            {"id": 4, "name": "Equinix SY3", "country": "Australia", "status": "Active"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    against(&server)
        .args(["-o", "json", "locations", "--name", "SY3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Equinix SY3").and(predicate::str::contains("SY1").not()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_vlan_in_use_exits_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/product/port/port-a/vlan"))
        .and(query_param("vlan", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([100]))))
        .mount(&server)
        .await;

    against(&server)
        .args(["vlan", "check", "port-a", "100"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("VLAN 100 is in use on port-a"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_of_unknown_product_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/product/vxc-9/action/CANCEL_NOW"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .expect(1)
        .mount(&server)
        .await;

    against(&server)
        .args(["--yes", "delete", "vxc-9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vxc-9 is already gone"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_product_get_missing_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/product/port-x"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    against(&server)
        .args(["product", "get", "port-x"])
        .assert()
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_price_vxc_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/pricebook/vxc"))
        .and(query_param("aLocationId", "3"))
        .and(query_param("bLocationId", "4"))
        .and(query_param("speed", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "price": 215.5,
            "currency": "AUD"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    against(&server)
        .args([
            "-o", "plain", "price", "vxc", "--a-location-id", "3", "--b-location-id", "4",
            "--speed", "500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("215.50"));
}

#[test]
fn test_config_show_redacts_secrets() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join("megaport");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        "[profiles.default]\nenvironment = \"staging\"\ntoken = \"super-secret\"\n",
    )
    .unwrap();

    megaport_cmd()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("staging")
                .and(predicate::str::contains("super-secret").not()),
        );
}
