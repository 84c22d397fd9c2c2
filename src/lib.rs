//! updraft - self-updating for deployed applications
//!
//! A release updater that keeps an installed application up to date from the
//! repository it was published from. It checks a configured source for new
//! versions, stages release archives in a scratch directory, and copies the
//! extracted file tree over the installation while protecting configured
//! folders from replacement.
//!
//! # Architecture Overview
//!
//! updraft follows a check/fetch/apply model where:
//! - `updraft.toml` names the release sources and the installation layout
//! - A version availability marker caches the result of the last check, so
//!   repeated checks do not hit the remote API
//! - Releases are staged completely before a single installed file is touched
//! - The update pass refuses to start while any affected file is unwritable
//!
//! ## Key Features
//!
//! - **Multiple backends**: GitHub tags or branches, GitLab and Gitea
//!   releases, and plain HTTP directory listings
//! - **Private repositories**: Access tokens per source, never logged
//! - **Staged updates**: Download and extraction happen away from the
//!   installation; `fetch` and `update` are separate steps
//! - **Protected folders**: Configured folder names (caches, vendored code,
//!   user data) survive every update
//! - **Event hooks**: Host applications observe availability, success, and
//!   failure through an injected event bus
//!
//! # Core Modules
//!
//! ## Core Functionality
//! - [`cache`] - Version availability marker next to the staged downloads
//! - [`cli`] - Command-line interface with check/status/fetch/update/clean
//! - [`config`] - `updraft.toml` parsing and source tables
//! - [`core`] - Error types and user-facing error rendering
//!
//! ## Update Pipeline
//! - [`source`] - Release source backends and the repository trait
//! - [`release`] - A single release: download, extraction, staging layout
//! - [`executor`] - Copies a staged release over the installation
//! - [`pipeline`] - Wires configuration, sources, and the executor together
//!
//! ## Supporting Modules
//! - [`events`] - Update lifecycle notifications for host applications
//! - [`token`] - Access token wrapper that keeps secrets out of logs
//! - [`utils`] - File tree helpers and terminal progress
//! - [`version`] - Version parsing and ordering across release schemes
//!
//! # Configuration Format (updraft.toml)
//!
//! ```toml
//! default = "stable"
//! version_installed = "2.6.0"
//! install_path = "/srv/app"
//! download_path = "/var/cache/updraft"
//! exclude_folders = ["storage", "vendor", ".git"]
//!
//! [sources.stable]
//! type = "github"
//! repository_vendor = "acme"
//! repository_name = "app"
//!
//! [sources.nightly]
//! type = "github"
//! repository_vendor = "acme"
//! repository_name = "app"
//! branch = "main"
//!
//! [sources.mirror]
//! type = "http"
//! repository_url = "https://downloads.example.com/releases/"
//! filename_template = "app-_VERSION_.zip"
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Report whether a newer release is available
//! updraft check
//!
//! # Stage the newest release without touching the installation
//! updraft fetch
//!
//! # Fetch and apply in one step
//! updraft update
//!
//! # Apply a specific version from a named source
//! updraft --source nightly update 2.7.1
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use updraft::config::UpdaterConfig;
//! use updraft::events::{EventBus, UpdaterEvent};
//! use updraft::pipeline::UpdaterManager;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let events = EventBus::new();
//! events.subscribe(|event| {
//!     if let UpdaterEvent::UpdateAvailable { new_version } = event {
//!         println!("update available: {new_version}");
//!     }
//! });
//!
//! let config = UpdaterConfig::load().await?;
//! let manager = UpdaterManager::new(config)?.with_events(events);
//! let pipeline = manager.source(None)?;
//!
//! if pipeline.is_new_version_available(None).await? {
//!     let release = pipeline.fetch(None).await?;
//!     pipeline.update(&release).await?;
//! }
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cache;
pub mod cli;
pub mod config;
pub mod core;

// Update pipeline
pub mod executor;
pub mod pipeline;
pub mod release;
pub mod source;

// Supporting modules
pub mod events;
pub mod token;
pub mod utils;
pub mod version;
