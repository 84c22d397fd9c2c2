//! Integration tests for error reporting on the command line
//!
//! Each test drives a misconfiguration or remote failure through the binary
//! and asserts on the message printed to stderr. Colors are disabled through
//! `NO_COLOR`, so the assertions match the plain text.

use crate::common::TestProject;
use anyhow::Result;

#[test]
fn unknown_source_name_fails_without_network() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(&format!(
        r#"
default = "origin"
version_installed = "2.6.0"
{}

[sources.origin]
type = "github"
repository_vendor = "acme"
repository_name = "app"
"#,
        project.path_settings()
    ))?;

    let output = project.run_updraft(&["--source", "mirror", "check"])?;
    output
        .assert_failure()
        .assert_stderr_contains("Source \"mirror\" is not configured");
    assert_eq!(output.code, Some(1));

    Ok(())
}

#[test]
fn blank_repository_coordinates_are_rejected() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(&format!(
        r#"
default = "origin"
version_installed = "2.6.0"
{}

[sources.origin]
type = "github"
repository_vendor = ""
repository_name = "app"
"#,
        project.path_settings()
    ))?;

    let output = project.run_updraft(&["check"])?;
    output
        .assert_failure()
        .assert_stderr_contains("Invalid repository configuration")
        .assert_stderr_contains("repository_vendor is not configured");

    Ok(())
}

#[test]
fn check_requires_an_installed_version() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    // The installed version is resolved before the remote is contacted.
    let listing = server
        .mock("GET", "/api/v1/repos/acme/app/releases")
        .expect(0)
        .create();

    project.write_config(&format!(
        r#"
default = "origin"
{}

[sources.origin]
type = "gitea"
base_url = "{}"
repository_vendor = "acme"
repository_name = "app"
"#,
        project.path_settings(),
        server.url()
    ))?;

    let output = project.run_updraft(&["check"])?;
    output
        .assert_failure()
        .assert_stderr_contains("Version installed not found")
        .assert_stderr_contains("Set version_installed in updraft.toml");
    listing.assert();

    Ok(())
}

#[test]
fn missing_config_file_is_reported() -> Result<()> {
    let project = TestProject::new()?;

    let output = project.run_updraft(&["--config", "does-not-exist.toml", "check"])?;
    output
        .assert_failure()
        .assert_stderr_contains("A required file or directory could not be found");

    Ok(())
}

#[test]
fn malformed_config_file_is_reported() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config("default = [unclosed")?;

    let output = project.run_updraft(&["check"])?;
    output
        .assert_failure()
        .assert_stderr_contains("Check the TOML syntax in your updraft.toml");

    Ok(())
}

#[test]
fn empty_release_listing_is_reported() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let listing = server
        .mock("GET", "/api/v1/repos/acme/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    project.write_config(&format!(
        r#"
default = "origin"
{}

[sources.origin]
type = "gitea"
base_url = "{}"
repository_vendor = "acme"
repository_name = "app"
"#,
        project.path_settings(),
        server.url()
    ))?;

    let output = project.run_updraft(&["fetch"])?;
    output
        .assert_failure()
        .assert_stderr_contains("No release found for version \"latest version\"");
    listing.assert();

    Ok(())
}
