//! Integration tests for the `updraft clean` command

use crate::common::{FileAssert, TestProject};
use anyhow::Result;

#[test]
fn clean_removes_staged_items() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(&project.path_settings())?;

    project.stage_file("2.7.1.zip", "archive bytes")?;
    project.stage_file("2.7.1/index.txt", "extracted release")?;
    project.stage_file(".version-available", "2.7.1")?;

    let output = project.run_updraft(&["clean"])?;
    output.assert_success().assert_stdout_contains("Removed 3 staged entries");

    FileAssert::not_exists(project.staging_path());
    Ok(())
}

#[test]
fn clean_reports_singular_entry() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(&project.path_settings())?;

    project.stage_file(".version-available", "2.7.1")?;

    let output = project.run_updraft(&["clean"])?;
    output.assert_success().assert_stdout_contains("Removed 1 staged entry");

    Ok(())
}

#[test]
fn clean_when_staging_directory_is_missing() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(&project.path_settings())?;
    std::fs::remove_dir_all(project.staging_path())?;

    let output = project.run_updraft(&["clean"])?;
    output.assert_success().assert_stdout_contains("Nothing to clean.");

    Ok(())
}

#[test]
fn clean_when_staging_directory_is_empty() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(&project.path_settings())?;

    let output = project.run_updraft(&["clean"])?;
    output.assert_success().assert_stdout_contains("Nothing to clean.");

    FileAssert::not_exists(project.staging_path());
    Ok(())
}
