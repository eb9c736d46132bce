// ABOUTME: Integration tests for the dockclean command line.
// ABOUTME: Covers --help output and argument errors that never reach a runtime.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn dockclean_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dockclean"));
    cmd.env_remove("RUST_LOG").env_remove("DOCKER_HOST");
    cmd
}

#[test]
fn help_shows_mode_flags() {
    dockclean_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--remove-stopped"))
        .stdout(predicate::str::contains("--size-limit"))
        .stdout(predicate::str::contains("--concurrent"))
        .stdout(predicate::str::contains("--max-workers"));
}

#[test]
fn size_limit_without_unit_is_a_usage_error() {
    dockclean_cmd()
        .args(["--size-limit", "500"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--unit"));
}

#[test]
fn unit_without_size_limit_is_a_usage_error() {
    dockclean_cmd()
        .args(["--unit", "MB"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--size-limit"));
}

#[test]
fn unknown_unit_is_a_usage_error() {
    dockclean_cmd()
        .args(["--size-limit", "5", "--unit", "TB"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown size unit 'TB'"));
}

#[test]
fn negative_size_limit_is_a_usage_error() {
    dockclean_cmd()
        .args(["--size-limit", "-1", "--unit", "MB"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("negative"));
}

#[test]
fn unknown_unit_wins_over_dry_run() {
    dockclean_cmd()
        .args(["--dry-run", "--size-limit", "5", "--unit", "parsecs"])
        .assert()
        .code(2);
}

#[test]
fn zero_max_workers_rejected() {
    dockclean_cmd()
        .args(["--max-workers", "0"])
        .assert()
        .code(2);
}

#[test]
fn quiet_and_json_conflict() {
    dockclean_cmd()
        .args(["--quiet", "--json"])
        .assert()
        .code(2);
}

#[test]
fn missing_config_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("nope.yml");

    dockclean_cmd()
        .arg("--config")
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn invalid_config_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("dockclean.yml"), "max_workers: 0\n").unwrap();

    dockclean_cmd()
        .current_dir(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("YAML parse error"));
}

#[test]
fn zero_timeout_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("dockclean.yml"), "timeout: 0s\n").unwrap();

    dockclean_cmd()
        .current_dir(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "invalid configuration: timeout must be greater than zero",
        ));
}

#[test]
fn unreachable_socket_is_a_connection_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let socket = temp_dir.path().join("missing.sock");

    dockclean_cmd()
        .current_dir(temp_dir.path())
        .arg("--dry-run")
        .arg("--socket")
        .arg(&socket)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains(
            "Hint: check that the daemon is running",
        ));
}
