use crate::config::UpdaterConfig;
use crate::utils;
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

/// Command-line arguments for the clean command.
///
/// Removes the staging directory with everything in it: downloaded
/// archives, extracted release trees, and the version availability marker.
/// The next `updraft check` will query the remote source again.
#[derive(Parser, Debug)]
pub struct CleanCommand {}

impl CleanCommand {
    /// Remove all staged downloads and the availability marker.
    pub async fn execute(self) -> Result<()> {
        let config = UpdaterConfig::load().await?;
        let staging = &config.download_path;

        if !staging.exists() {
            println!("Nothing to clean.");
            return Ok(());
        }

        let entries = std::fs::read_dir(staging)
            .with_context(|| format!("Failed to read staging directory {}", staging.display()))?
            .filter_map(Result::ok)
            .count();

        utils::remove_dir_all(staging)?;

        if entries == 0 {
            println!("Nothing to clean.");
        } else {
            let noun = if entries == 1 { "entry" } else { "entries" };
            println!(
                "{}",
                format!("Removed {} staged {} from {}", entries, noun, staging.display()).green()
            );
        }

        Ok(())
    }
}
