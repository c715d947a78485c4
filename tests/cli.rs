//! General top level CLI tests.
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn version_contains_version() {
    let version = format!("ask {}", env!("CARGO_PKG_VERSION"));

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg("--version");

    cmd.assert().success();
    cmd.assert().stdout(predicate::str::starts_with(version));
}

#[test]
fn short_version_flag_prints_version() {
    let version = format!("ask {}", env!("CARGO_PKG_VERSION"));

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg("-v");

    cmd.assert().success();
    cmd.assert().stdout(predicate::str::starts_with(version));
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}
