//! Smoke tests for the storeprobe binary

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn storeprobe() -> Command {
    let mut cmd = Command::cargo_bin("storeprobe").expect("storeprobe binary should exist");
    cmd.env_remove("RUST_LOG").env_remove("STOREPROBE_CONFIG");
    cmd
}

#[test]
fn test_version_flag() {
    storeprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_subcommands() {
    storeprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_no_args_fails() {
    storeprobe().assert().failure();
}

#[test]
fn test_list_api_suite() {
    storeprobe()
        .args(["--color", "never", "list", "--suite", "api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api.pet.find_by_status"))
        .stdout(predicate::str::contains("known failure:"))
        .stdout(predicate::str::contains("ui.").not())
        .stdout(predicate::str::contains("12 cases"));
}

#[test]
fn test_missing_config_file() {
    storeprobe()
        .args(["--config", "/nonexistent/probe.yaml", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_malformed_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.yaml");
    std::fs::write(&path, "api: [not, a, map]\n").unwrap();
    storeprobe()
        .arg("--config")
        .arg(&path)
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("YAML"));
}

#[test]
fn test_run_with_no_matching_case_is_green() {
    storeprobe()
        .args(["run", "--filter", "no-such-case", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cases\": []"));
}
