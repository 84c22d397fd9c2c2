//! updraft CLI entry point
//!
//! This is the main executable for updraft. Argument parsing and the
//! subcommands live in [`updraft::cli`]; failures come back through the
//! user-facing error rendering in [`updraft::core::error`].
//!
//! The CLI keeps a deployed application up to date:
//! - `check` - Report whether a newer release is available
//! - `status` - Show the installed and newest available versions
//! - `fetch` - Download and extract a release into the staging directory
//! - `update` - Fetch a release and copy it over the installation
//! - `clean` - Remove staged downloads and the availability marker

use anyhow::Result;
use clap::Parser;
use updraft::cli;
use updraft::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Windows terminals need virtual terminal processing for ANSI colors
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Failures are rendered with details and a suggestion, then exit nonzero
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
