//! Integration tests for the `unifi-ap-exporter` binary.
//!
//! Covers flag parsing and the start-up failure paths. Nothing here binds a
//! port or dials a device.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::NamedTempFile;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the binary with env isolation.
fn exporter_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("unifi-ap-exporter");
    cmd.env_remove("UAPX_CONFIG")
        .env_remove("UAPX_GLOBAL__PORT")
        .env_remove("UAPX_GLOBAL__TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_version_flag() {
    exporter_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unifi-ap-exporter"));
}

#[test]
fn test_help_flag() {
    exporter_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("--config")
            .and(predicate::str::contains("--json"))
            .and(predicate::str::contains("--verbose"))
            .and(predicate::str::contains("--debug")),
    );
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let output = exporter_cmd().arg("--listen").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--listen"));
}

// ── Config failures ─────────────────────────────────────────────────

#[test]
fn test_missing_config_exits_zero() {
    let output = exporter_cmd()
        .args(["--config", "/nonexistent/unifi-ap-exporter.yaml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(text.contains("cannot read config file"), "{text}");
    assert!(output.stdout.is_empty(), "logs must go to stderr");
}

#[test]
fn test_empty_fleet_exits_zero() {
    let file = config_file("global:\n  port: 9130\naccesspoints: []\n");
    let output = exporter_cmd()
        .arg("--config")
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(text.contains("no access points defined"), "{text}");
}

#[test]
fn test_config_from_environment() {
    let file = config_file("accesspoints:\n  - name: a\n    address: 10.0.0.1\n    password: pw\n");
    let output = exporter_cmd()
        .env("UAPX_CONFIG", file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(text.contains("accesspoint #1 is missing `username`"), "{text}");
}

#[test]
fn test_json_logging() {
    let output = exporter_cmd()
        .args(["--json", "--config", "/nonexistent/unifi-ap-exporter.yaml"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .find(|l| l.contains("cannot read config file"))
        .unwrap();
    assert!(line.starts_with('{'), "{line}");
    assert!(line.contains(r#""level":"ERROR""#), "{line}");
}

#[test]
fn test_unrelated_env_vars_are_ignored() {
    let file = config_file("accesspoints:\n  - name: a\n    address: 10.0.0.1\n    password: pw\n");
    let output = exporter_cmd()
        .env("UAPX_METRICS_PATH", "/scrape")
        .env("UAPX_GLOBAL__LISTEN", "0.0.0.0")
        .arg("--config")
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(text.contains("accesspoint #1 is missing `username`"), "{text}");
    assert!(!text.contains("unknown field"), "{text}");
}

#[test]
fn test_global_env_override_applies() {
    let file = config_file(
        "accesspoints:\n  - name: a\n    address: 10.0.0.1\n    username: admin\n    password: pw\n",
    );
    let output = exporter_cmd()
        .env("UAPX_GLOBAL__TIMEOUT", "0")
        .arg("--config")
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(text.contains("invalid global.timeout"), "{text}");
}
