use crate::config::UpdaterConfig;
use crate::pipeline::UpdaterManager;
use crate::utils::progress::ProgressBar;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

/// Command-line arguments for the update check command.
///
/// Compares the installed version against the newest release published by
/// the configured source and reports whether an update is available. The
/// result is cached next to the staged downloads, so repeated checks do not
/// hit the remote API until the pending update is applied.
///
/// # Examples
///
/// ```bash
/// # Check using the configured installed version
/// updraft check
///
/// # Check against an explicitly supplied version
/// updraft check --current 2.6.0
///
/// # Check a specific configured source
/// updraft --source nightly check
/// ```
///
/// # Output
///
/// ```text
/// # When an update is available
/// A new version [2.7.1] is available.
///
/// # When up to date
/// There's no new version available.
/// ```
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Currently installed version, overriding the configured `version_installed`.
    ///
    /// Useful when the application tracks its own version and passes it in,
    /// or when the configuration file is not kept up to date after installs.
    #[arg(long, value_name = "VERSION")]
    pub current: Option<String>,
}

impl CheckCommand {
    /// Execute the check against the named source, or the default one.
    pub async fn execute_with_source(self, source: Option<String>) -> Result<()> {
        let config = UpdaterConfig::load().await?;
        let manager = UpdaterManager::new(config)?;
        let pipeline = manager.source(source.as_deref())?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Checking for updates...");
        let available = pipeline.is_new_version_available(self.current.as_deref()).await;
        spinner.finish_and_clear();

        if available? {
            let version = pipeline.version_available().await?;
            println!("{}", format!("A new version [{version}] is available.").green());
        } else {
            println!("There's no new version available.");
        }

        Ok(())
    }
}
