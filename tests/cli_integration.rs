//! CLI integration tests
//!
//! Smoke tests for the server binary's argument handling.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("vidproxy");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let mut cmd = cargo_bin_cmd!("vidproxy");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_invalid_port_rejected() {
    let mut cmd = cargo_bin_cmd!("vidproxy");
    cmd.args(["--port", "not-a-port"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_config_file_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[cache]\ncapacity = 0\n").unwrap();

    let mut cmd = cargo_bin_cmd!("vidproxy");
    cmd.arg("--config").arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cache capacity must be positive"));
}
