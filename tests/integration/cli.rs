//! Tests for the top-level CLI surface, driven through the compiled binary.

use predicates::prelude::*;

fn updraft() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("updraft").unwrap()
}

#[test]
fn help_lists_every_command() {
    updraft()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Updraft checks a configured release source",
        ))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("clean"));
}

#[test]
fn subcommand_help_shows_global_options() {
    updraft()
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--source"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--no-progress"));
}

#[test]
fn version_flag_reports_the_package_version() {
    updraft()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_is_rejected() {
    updraft()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn bare_invocation_prints_usage() {
    updraft().assert().failure().stderr(predicate::str::contains("Usage"));
}
