use crate::config::UpdaterConfig;
use crate::pipeline::UpdaterManager;
use crate::utils::progress::ProgressBar;
use crate::version;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::debug;

/// Command-line arguments for the status command.
///
/// Shows the installed version next to the newest version the source
/// currently publishes. Unlike `updraft check`, this never records an
/// availability marker, so it has no effect on later checks.
///
/// # Output
///
/// ```text
/// Provider:          github-tag
/// Installed version: 2.6.0
/// Latest version:    2.7.1 (update available)
/// ```
#[derive(Parser, Debug)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Show version information for the named source, or the default one.
    pub async fn execute_with_source(self, source: Option<String>) -> Result<()> {
        let config = UpdaterConfig::load().await?;
        let manager = UpdaterManager::new(config)?;
        let pipeline = manager.source(source.as_deref())?;

        println!("Provider:          {}", pipeline.provider());

        let installed = pipeline.version_installed().ok();
        match &installed {
            Some(version) => println!("Installed version: {version}"),
            None => println!("Installed version: {}", "(not configured)".yellow()),
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Checking latest version...");
        let latest = pipeline.version_available().await;
        spinner.finish_and_clear();

        match latest {
            Ok(latest) => {
                let note = match &installed {
                    Some(installed) if version::is_newer(installed, &latest) => {
                        "(update available)".yellow()
                    }
                    Some(_) => "(up to date)".green(),
                    None => "".normal(),
                };
                println!("Latest version:    {latest} {note}");
            }
            Err(e) => {
                debug!("Latest version lookup failed: {e:#}");
                println!("Latest version:    {}", "(unable to check)".yellow());
            }
        }

        Ok(())
    }
}
