use crate::config::UpdaterConfig;
use crate::pipeline::UpdaterManager;
use crate::utils::progress::ProgressBar;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

/// Command-line arguments for the fetch command.
///
/// Downloads and extracts a release into the staging directory without
/// touching the installation. The staged files can be inspected before
/// running `updraft update`, which will find them already in place and skip
/// the download.
///
/// # Examples
///
/// ```bash
/// # Stage the newest release
/// updraft fetch
///
/// # Stage a specific version
/// updraft fetch 2.7.1
///
/// # Keep the downloaded archive next to the extracted tree
/// # (set keep_archive = true in updraft.toml)
/// ```
#[derive(Parser, Debug)]
pub struct FetchCommand {
    /// Version to stage. Defaults to the newest remote release.
    ///
    /// When the requested version is not published, the newest release is
    /// staged instead and a notice is logged.
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,
}

impl FetchCommand {
    /// Stage a release from the named source, or the default one.
    pub async fn execute_with_source(self, source: Option<String>) -> Result<()> {
        let config = UpdaterConfig::load().await?;
        let manager = UpdaterManager::new(config)?;
        let pipeline = manager.source(source.as_deref())?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_message(match &self.version {
            Some(version) => format!("Fetching release {version}..."),
            None => "Fetching latest release...".to_string(),
        });
        let release = pipeline.fetch(self.version.as_deref()).await;
        spinner.finish_and_clear();
        let release = release?;

        let version = release.version().unwrap_or("unknown");
        match release.extraction_dir() {
            Some(dir) => println!(
                "{}",
                format!("Release {} staged at {}", version, dir.display()).green()
            ),
            None => println!("{}", format!("Release {version} staged.").green()),
        }

        Ok(())
    }
}
