use crate::config::UpdaterConfig;
use crate::core::UpdraftError;
use crate::pipeline::UpdaterManager;
use crate::utils::progress::ProgressBar;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

/// Command-line arguments for the update command.
///
/// Fetches a release and applies it to the installation in one step. The
/// release is staged first (download and extraction into the staging
/// directory), then the staged file tree is copied over the installation
/// with the configured folders protected from replacement.
///
/// Before any file is touched, every file in the installation that would be
/// replaced is checked for write access. If any of them is not writable the
/// update is aborted and the installation is left exactly as it was.
///
/// # Examples
///
/// ```bash
/// # Update to the newest release
/// updraft update
///
/// # Update to a specific version
/// updraft update 2.7.1
///
/// # Update from a specific configured source
/// updraft --source mirror update
/// ```
///
/// # Safety
///
/// The copy itself is not transactional: once the writability check passes,
/// files are replaced in place. Run `updraft check` and schedule updates
/// during a maintenance window for installations that are actively serving.
#[derive(Parser, Debug)]
pub struct UpdateCommand {
    /// Version to update to. Defaults to the newest remote release.
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,
}

impl UpdateCommand {
    /// Fetch and apply a release from the named source, or the default one.
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

        let version = release.version().unwrap_or("unknown").to_string();
        println!("{}", format!("Updating to version {version}...").cyan());

        if pipeline.update(&release).await? {
            println!(
                "{}",
                format!("Update to version {version} completed successfully!").green()
            );
            Ok(())
        } else {
            println!("{}", "Update aborted, the installation was not modified.".red());
            Err(UpdraftError::PermissionDenied {
                path: manager.config().install_path.display().to_string(),
            }
            .into())
        }
    }
}
