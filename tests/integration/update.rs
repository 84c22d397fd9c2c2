//! Tests for the `update` command: applying a staged release over the
//! installation tree, folder protection, and the writability gate.

use crate::common::{FileAssert, TestProject, zip_archive};
use anyhow::Result;

fn gitea_config(project: &TestProject, base_url: &str, exclude: &[&str]) -> String {
    let exclude_list: Vec<String> = exclude.iter().map(|name| format!("\"{name}\"")).collect();
    format!(
        r#"default = "origin"
version_installed = "2.6.0"
exclude_folders = [{}]
{}

[sources.origin]
type = "gitea"
base_url = "{base_url}"
repository_vendor = "acme"
repository_name = "app"
"#,
        exclude_list.join(", "),
        project.path_settings()
    )
}

/// Serve a one-entry release listing plus the archive behind it. The
/// returned mocks stay registered for as long as the caller holds them.
fn mock_release(
    server: &mut mockito::Server,
    version: &str,
    entries: &[(&str, &str)],
) -> (mockito::Mock, mockito::Mock) {
    let url = server.url();
    let listing = server
        .mock("GET", "/api/v1/repos/acme/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"[{{"tag_name": "{version}", "zipball_url": "{url}/archives/{version}.zip"}}]"#
        ))
        .create();
    let download = server
        .mock("GET", format!("/archives/{version}.zip").as_str())
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(zip_archive(entries))
        .create();
    (listing, download)
}

#[test]
fn update_replaces_installed_files() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let (listing, download) = mock_release(
        &mut server,
        "2.7.1",
        &[
            ("app/index.txt", "new index"),
            ("app/lib/util.txt", "new util"),
            ("app/added.txt", "fresh file"),
        ],
    );

    project.write_config(&gitea_config(&project, &server.url(), &[]))?;
    project.install_file("index.txt", "old index")?;
    project.install_file("lib/util.txt", "old util")?;
    project.stage_file(".version-available", "2.7.1")?;

    let output = project.run_updraft(&["update"])?;
    output
        .assert_success()
        .assert_stdout_contains("Updating to version 2.7.1...")
        .assert_stdout_contains("Update to version 2.7.1 completed successfully!");
    listing.assert();
    download.assert();

    FileAssert::equals(project.install_path().join("index.txt"), "new index");
    FileAssert::equals(project.install_path().join("lib/util.txt"), "new util");
    FileAssert::equals(project.install_path().join("added.txt"), "fresh file");

    // Staging and the availability marker are cleared after a completed run.
    FileAssert::not_exists(project.staging_path().join("2.7.1"));
    FileAssert::not_exists(project.staging_path().join(".version-available"));

    Ok(())
}

#[test]
fn update_preserves_excluded_folders() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let _mocks = mock_release(
        &mut server,
        "2.7.1",
        &[
            ("app/index.txt", "new index"),
            ("app/storage/data.txt", "shipped data"),
        ],
    );

    project.write_config(&gitea_config(&project, &server.url(), &["storage"]))?;
    project.install_file("index.txt", "old index")?;
    project.install_file("storage/data.txt", "user data")?;

    project.run_updraft(&["update"])?.assert_success();

    FileAssert::equals(project.install_path().join("index.txt"), "new index");
    // The protected folder keeps its installed content.
    FileAssert::equals(project.install_path().join("storage/data.txt"), "user data");

    Ok(())
}

#[test]
fn update_never_ships_excluded_folders() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let _mocks = mock_release(
        &mut server,
        "2.7.1",
        &[
            ("app/index.txt", "new index"),
            ("app/storage/seed.txt", "seed data"),
        ],
    );

    project.write_config(&gitea_config(&project, &server.url(), &["storage"]))?;
    project.install_file("index.txt", "old index")?;

    project.run_updraft(&["update"])?.assert_success();

    // Excluded names are dropped from the release even when the
    // installation does not have them yet.
    FileAssert::equals(project.install_path().join("index.txt"), "new index");
    FileAssert::not_exists(project.install_path().join("storage"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn update_aborts_when_installed_file_is_not_writable() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let project = TestProject::new()?;
    let mut server = mockito::Server::new();

    let _mocks = mock_release(
        &mut server,
        "2.7.1",
        &[("app/index.txt", "new index"), ("app/locked.txt", "new locked")],
    );

    project.write_config(&gitea_config(&project, &server.url(), &[]))?;
    project.install_file("index.txt", "old index")?;
    project.install_file("locked.txt", "old locked")?;

    let locked = project.install_path().join("locked.txt");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o444))?;

    let output = project.run_updraft(&["update"])?;
    output
        .assert_failure()
        .assert_stdout_contains("Update aborted")
        .assert_stderr_contains("Permission denied");
    assert_eq!(output.code, Some(1));

    // Nothing was modified and the staged release is kept for a retry.
    FileAssert::equals(project.install_path().join("index.txt"), "old index");
    FileAssert::equals(project.install_path().join("locked.txt"), "old locked");
    FileAssert::exists(project.staging_path().join("2.7.1"));

    Ok(())
}

#[test]
fn update_uses_already_staged_release() -> Result<()> {
    let project = TestProject::new()?;
    let mut server = mockito::Server::new();
    let url = server.url();

    let listing = server
        .mock("GET", "/api/v1/repos/acme/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"[{{"tag_name": "2.7.1", "zipball_url": "{url}/archives/2.7.1.zip"}}]"#
        ))
        .create();
    let download = server.mock("GET", "/archives/2.7.1.zip").expect(0).create();

    project.write_config(&gitea_config(&project, &url, &[]))?;
    project.install_file("index.txt", "old index")?;
    project.stage_file("2.7.1/index.txt", "staged index")?;

    project.run_updraft(&["update"])?.assert_success();
    listing.assert();
    download.assert();
    FileAssert::equals(project.install_path().join("index.txt"), "staged index");

    Ok(())
}
