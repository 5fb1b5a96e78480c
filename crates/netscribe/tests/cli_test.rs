// CLI surface tests: argument parsing, config-less failure modes, and
// exit codes. Network-dependent behavior is covered in the core crate.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn netscribe() -> Command {
    let mut cmd = Command::cargo_bin("netscribe").unwrap();
    // isolate from the host environment and platform config file
    for (key, _) in std::env::vars() {
        if key.starts_with("NETSCRIBE_") {
            cmd.env_remove(key);
        }
    }
    cmd.arg("--config").arg("/nonexistent/netscribe.toml");
    cmd
}

#[test]
fn help_describes_subcommands() {
    netscribe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("once"))
        .stdout(predicate::str::contains("health"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn once_without_controllers_exits_with_config_error() {
    let dir = TempDir::new().unwrap();
    netscribe()
        .env("NETSCRIBE_OUTPUT_DIR", dir.path())
        .arg("once")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no controllers"));
}

#[test]
fn missing_password_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    netscribe()
        .env("NETSCRIBE_OUTPUT_DIR", dir.path())
        .env("NETSCRIBE_URL", "https://192.0.2.1:8443")
        .env("NETSCRIBE_USERNAME", "admin")
        .arg("once")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no password"));
}

#[test]
fn health_with_no_recorded_runs_is_unhealthy() {
    let dir = TempDir::new().unwrap();
    netscribe()
        .env("NETSCRIBE_OUTPUT_DIR", dir.path())
        .env("NETSCRIBE_URL", "https://192.0.2.1:8443")
        .env("NETSCRIBE_PASSWORD", "secret")
        .arg("health")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("overall: Unhealthy"));
}

#[test]
fn invalid_schedule_rejected_before_any_network_use() {
    let dir = TempDir::new().unwrap();
    netscribe()
        .env("NETSCRIBE_OUTPUT_DIR", dir.path())
        .env("NETSCRIBE_URL", "https://192.0.2.1:8443")
        .env("NETSCRIBE_PASSWORD", "secret")
        .env("NETSCRIBE_SCHEDULE", "25:00")
        .arg("once")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("schedule"));
}
