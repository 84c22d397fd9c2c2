//! Tests for the `check` command: availability reporting, the version
//! marker next to staged downloads, and remote call avoidance.

use crate::common::TestProject;
use anyhow::Result;

fn gitea_config(project: &TestProject, base_url: &str, installed: &str) -> String {
    format!(
        r#"default = "origin"
version_installed = "{installed}"
{}

[sources.origin]
type = "gitea"
base_url = "{base_url}"
repository_vendor = "acme"
repository_name = "app"
"#,
        project.path_settings()
    )
}

fn releases_json(versions: &[&str]) -> String {
    let entries: Vec<String> = versions
        .iter()
        .map(|v| {
            format!(r#"{{"tag_name": "{v}", "zipball_url": "http://127.0.0.1:9/archive/{v}.zip"}}"#)
        })
        .collect();
    format!("[{}]", entries.join(", "))
}

#[test]
fn check_reports_new_version() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let mock = server
        .mock("GET", "/api/v1/repos/acme/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_json(&["2.7.1", "2.6.0"]))
        .create();

    project.write_config(&gitea_config(&project, &server.url(), "2.6.0"))?;

    let output = project.run_updraft(&["check"])?;
    output.assert_success().assert_stdout_contains("A new version [2.7.1] is available.");
    mock.assert();

    // The detected version is recorded next to the staged downloads.
    let marker = project.staging_path().join(".version-available");
    assert_eq!(std::fs::read_to_string(marker)?, "2.7.1");

    Ok(())
}

#[test]
fn check_reports_up_to_date() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let listing = server
        .mock("GET", "/api/v1/repos/acme/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_json(&["2.6.0"]))
        .create();

    project.write_config(&gitea_config(&project, &server.url(), "2.6.0"))?;

    let output = project.run_updraft(&["check"])?;
    output.assert_success().assert_stdout_contains("There's no new version available.");
    listing.assert();

    // No marker is written when nothing newer exists.
    assert!(!project.staging_path().join(".version-available").exists());

    Ok(())
}

#[test]
fn check_uses_marker_without_calling_remote() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let mock = server.mock("GET", "/api/v1/repos/acme/app/releases").expect(0).create();

    project.write_config(&gitea_config(&project, &server.url(), "2.6.0"))?;
    project.stage_file(".version-available", "2.7.1")?;

    let output = project.run_updraft(&["check"])?;
    output.assert_success().assert_stdout_contains("A new version [2.7.1] is available.");
    mock.assert();

    Ok(())
}

#[test]
fn check_marker_matching_current_is_up_to_date() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let mock = server.mock("GET", "/api/v1/repos/acme/app/releases").expect(0).create();

    project.write_config(&gitea_config(&project, &server.url(), "2.6.0"))?;
    project.stage_file(".version-available", "2.7.1")?;

    let output = project.run_updraft(&["check", "--current", "2.7.1"])?;
    output.assert_success().assert_stdout_contains("There's no new version available.");
    mock.assert();

    // The marker is left in place; only an update or clean removes it.
    assert_eq!(
        std::fs::read_to_string(project.staging_path().join(".version-available"))?,
        "2.7.1"
    );

    Ok(())
}

#[test]
fn check_with_current_override() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let listing = server
        .mock("GET", "/api/v1/repos/acme/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_json(&["2.7.1"]))
        .create();

    project.write_config(&gitea_config(&project, &server.url(), "2.6.0"))?;

    // The override takes precedence over the configured installed version.
    let output = project.run_updraft(&["check", "--current", "3.0.0"])?;
    output.assert_success().assert_stdout_contains("There's no new version available.");
    listing.assert();

    Ok(())
}

#[test]
fn check_sends_access_token() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let mock = server
        .mock("GET", "/api/v1/repos/acme/app/releases")
        .match_header("authorization", "Bearer sekrit")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_json(&["2.7.1"]))
        .create();

    let config = format!(
        r#"default = "origin"
version_installed = "2.6.0"
{}

[sources.origin]
type = "gitea"
base_url = "{}"
repository_vendor = "acme"
repository_name = "app"
token = "sekrit"
"#,
        project.path_settings(),
        server.url()
    );
    project.write_config(&config)?;

    project.run_updraft(&["check"])?.assert_success();
    mock.assert();

    Ok(())
}
