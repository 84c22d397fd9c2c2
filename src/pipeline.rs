//! Orchestration: wires configuration, sources and the executor together.
//!
//! The [`UpdaterManager`] owns the shared collaborators (configuration, HTTP
//! client, event bus) and hands out [`UpdatePipeline`] handles, one per
//! configured source. A handle pairs the resolved backend with an executor
//! for the configured installation root; pipelines are built fresh per call
//! and carry no hidden shared state beyond those collaborators.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::VersionCache;
use crate::config::UpdaterConfig;
use crate::events::EventBus;
use crate::executor::UpdateExecutor;
use crate::release::Release;
use crate::source::{self, SourceContext, SourceRepository};

/// Builds update pipelines from a configuration.
pub struct UpdaterManager {
    config: UpdaterConfig,
    client: reqwest::Client,
    events: EventBus,
}

impl UpdaterManager {
    /// Create a manager around a configuration, with a fresh event bus.
    pub fn new(config: UpdaterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("updraft/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config,
            client,
            events: EventBus::new(),
        })
    }

    /// Replace the event bus, e.g. with one the application already hands to
    /// its own subscribers.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// The configuration this manager was built from.
    #[must_use]
    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// The event bus lifecycle events are emitted on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Build the pipeline for one configured source, the default source when
    /// `name` is `None`.
    pub fn source(&self, name: Option<&str>) -> Result<UpdatePipeline> {
        let (name, source_config) = self.config.source_config(name)?;
        let cache = VersionCache::new(&self.config.download_path);

        let context = SourceContext {
            client: self.client.clone(),
            cache: cache.clone(),
            events: self.events.clone(),
            download_path: self.config.download_path.clone(),
            version_installed: self.config.version_installed.clone(),
            token: None,
            keep_archive: self.config.keep_archive,
        };

        let source = source::resolve_source(name, source_config, context)?;
        let executor = UpdateExecutor::new(
            self.config.install_path.clone(),
            self.config.exclude_folders.clone(),
            cache,
            self.events.clone(),
        );

        Ok(UpdatePipeline {
            source,
            executor,
        })
    }
}

/// A resolved source paired with the executor for the installation root.
pub struct UpdatePipeline {
    source: Box<dyn SourceRepository>,
    executor: UpdateExecutor,
}

impl UpdatePipeline {
    /// Short name of the resolved backend.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        self.source.provider()
    }

    /// Whether a version newer than `current` (or the configured installed
    /// version) is available. See [`SourceRepository::is_new_version_available`].
    pub async fn is_new_version_available(&self, current: Option<&str>) -> Result<bool> {
        self.source.is_new_version_available(current).await
    }

    /// The version an update would install.
    pub async fn version_available(&self) -> Result<String> {
        self.source.version_available().await
    }

    /// The statically configured installed version.
    pub fn version_installed(&self) -> Result<String> {
        self.source.version_installed()
    }

    /// Resolve a release and stage it locally.
    pub async fn fetch(&self, version: Option<&str>) -> Result<Release> {
        self.source.fetch(version).await
    }

    /// Overlay a staged release onto the installation root.
    pub async fn update(&self, release: &Release) -> Result<bool> {
        self.executor.run(release).await
    }
}

impl std::fmt::Debug for UpdatePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePipeline").field("provider", &self.provider()).finish()
    }
}
