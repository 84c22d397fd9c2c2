//! Command-line interface for updraft.
//!
//! This module contains the CLI command implementations for driving the
//! update pipeline from a terminal: checking for new releases, inspecting
//! version status, staging downloads, applying updates, and cleaning the
//! staging area.
//!
//! # Available Commands
//!
//! - `check` - Report whether a newer release is available
//! - `status` - Show the installed and newest available versions
//! - `fetch` - Download and extract a release into the staging directory
//! - `update` - Fetch a release and copy it over the installation
//! - `clean` - Remove staged downloads and the availability marker
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--config` - Path to the configuration file (default `./updraft.toml`)
//! - `--source` - Name of the configured source to use
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--no-progress` - Disable spinners
//!
//! # Basic Workflow
//!
//! ```bash
//! # 1. Check whether a newer release exists
//! updraft check
//!
//! # 2. Stage it without touching the installation
//! updraft fetch
//!
//! # 3. Apply it
//! updraft update
//!
//! # Or check and apply a named source in one step
//! updraft --source mirror update
//! ```

mod check;
mod clean;
mod fetch;
mod status;
mod update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Runtime configuration for CLI execution.
///
/// Holds the settings that would otherwise be read straight from the
/// environment, so tests and programmatic callers can inject them without
/// touching global state until [`apply_to_env`](Self::apply_to_env) is
/// called.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the tracing filter.
    ///
    /// `--verbose` maps to `debug`, `--quiet` to `error`. When `None`, the
    /// `RUST_LOG` environment variable applies, and warnings are shown when
    /// that is unset too.
    pub log_level: Option<String>,

    /// Whether to disable spinners and animated output.
    ///
    /// When `true`, sets the `UPDRAFT_NO_PROGRESS` environment variable,
    /// which every spinner checks before drawing.
    pub no_progress: bool,

    /// Custom path to the configuration file.
    ///
    /// When specified, sets the `UPDRAFT_CONFIG` environment variable, which
    /// [`UpdaterConfig::load`](crate::config::UpdaterConfig::load) reads
    /// before looking for `./updraft.toml`.
    pub config_path: Option<String>,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply this configuration to the process environment.
    ///
    /// Must be called from the main thread before any worker threads are
    /// spawned, since environment mutation is not synchronized.
    pub fn apply_to_env(&self) {
        if self.no_progress {
            unsafe { std::env::set_var("UPDRAFT_NO_PROGRESS", "1") };
        }

        if let Some(path) = &self.config_path {
            unsafe { std::env::set_var("UPDRAFT_CONFIG", path) };
        }
    }

    /// Install the global tracing subscriber.
    ///
    /// The filter is taken from [`log_level`](Self::log_level) when set,
    /// falling back to the `RUST_LOG` environment variable and finally to
    /// warnings only. Repeated calls are ignored, so tests can run commands
    /// back to back.
    pub fn init_logging(&self) {
        let filter = match self.log_level.as_deref() {
            Some(level) => EnvFilter::new(format!("updraft={level}")),
            None if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
            None => EnvFilter::new("updraft=warn"),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for updraft.
///
/// Represents the root command and its global options, using the `clap`
/// derive API for parsing, help text, and validation. Options marked
/// `global = true` are accepted by every subcommand.
#[derive(Parser)]
#[command(
    name = "updraft",
    about = "Keep a deployed application up to date from its release source",
    version,
    long_about = "Updraft checks a configured release source (GitHub, GitLab, Gitea, or a \
plain HTTP listing) for new versions, stages release archives, and copies them over the \
installed file tree while protecting configured folders."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Shows debug-level detail about remote listings, staging paths, and
    /// every file operation during an update.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    ///
    /// Command results are still printed; only the log stream is reduced.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file.
    ///
    /// Overrides the default lookup of `./updraft.toml`.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Name of the configured source to use.
    ///
    /// Defaults to the `default` entry in the configuration file.
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Disable spinners for automation.
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands for the updraft CLI.
#[derive(Subcommand)]
enum Commands {
    /// Check whether a newer release is available.
    ///
    /// See [`check::CheckCommand`] for detailed options and behavior.
    Check(check::CheckCommand),

    /// Show the installed version and the newest available one.
    ///
    /// See [`status::StatusCommand`] for detailed options and behavior.
    Status(status::StatusCommand),

    /// Download and extract a release into the staging directory.
    ///
    /// See [`fetch::FetchCommand`] for detailed options and behavior.
    Fetch(fetch::FetchCommand),

    /// Fetch a release and copy it over the installation.
    ///
    /// See [`update::UpdateCommand`] for detailed options and behavior.
    Update(update::UpdateCommand),

    /// Remove staged downloads and the availability marker.
    ///
    /// See [`clean::CleanCommand`] for detailed options and behavior.
    Clean(clean::CleanCommand),
}

impl Cli {
    /// Execute the CLI with configuration built from the parsed arguments.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed CLI arguments.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Execute the CLI with a specific configuration.
    ///
    /// Accepts an external configuration instead of building one from the
    /// arguments, so tests can run commands with injected settings.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply_to_env();
        config.init_logging();

        match self.command {
            Commands::Check(cmd) => cmd.execute_with_source(self.source).await,
            Commands::Status(cmd) => cmd.execute_with_source(self.source).await,
            Commands::Fetch(cmd) => cmd.execute_with_source(self.source).await,
            Commands::Update(cmd) => cmd.execute_with_source(self.source).await,
            Commands::Clean(cmd) => cmd.execute().await,
        }
    }
}
