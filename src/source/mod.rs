//! Release sources: one trait, five remote backends.
//!
//! A [`SourceRepository`] answers two questions for one configured remote:
//! what versions exist (most recent first) and where their archives live. The
//! shared update logic (version checks, cache handling, fetch) lives in
//! provided trait methods so each backend only implements its listing call
//! and, where the remote demands it, archive naming and authentication.
//!
//! # Backends
//!
//! - [`GithubTagSource`] - GitHub tags, zipball per tag
//! - [`GithubBranchSource`] - GitHub branch head, archive per commit
//! - [`GitlabSource`] - GitLab releases API (gitlab.com or self-hosted)
//! - [`GiteaSource`] - Gitea releases API (self-hosted forges)
//! - [`HttpSource`] - plain directory-listing page scraped for archives
//!
//! Backends are constructed through [`resolve_source`], keyed on the
//! configured source table. Repository coordinates are validated before any
//! network call; a broken configuration is reported, never paniced on.

pub mod gitea;
pub mod github_branch;
pub mod github_tag;
pub mod gitlab;
pub mod http;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::cache::VersionCache;
use crate::config::SourceConfig;
use crate::core::UpdraftError;
use crate::events::{EventBus, UpdaterEvent};
use crate::release::Release;
use crate::token::AccessToken;
use crate::version;

pub use gitea::GiteaSource;
pub use github_branch::GithubBranchSource;
pub use github_tag::GithubTagSource;
pub use gitlab::GitlabSource;
pub use http::HttpSource;

/// Everything a backend needs beyond its own coordinates.
///
/// Built by the update manager and injected into each backend, so sources
/// never reach for global state.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Shared HTTP client (carries the crate user agent).
    pub client: reqwest::Client,
    /// Single-value store of the last detected available version.
    pub cache: VersionCache,
    /// Sink for lifecycle events.
    pub events: EventBus,
    /// Directory archives are downloaded into.
    pub download_path: PathBuf,
    /// Statically configured installed version, when known.
    pub version_installed: Option<String>,
    /// Credential for authenticated remotes.
    pub token: Option<AccessToken>,
    /// Keep the archive file after extraction instead of deleting it.
    pub keep_archive: bool,
}

/// One remote release as reported by a backend listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Version label identifying the release (tag name, commit date, ...).
    pub version: String,
    /// Where the release archive can be downloaded.
    pub download_url: String,
}

/// A remote location that publishes releases of the installed application.
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Short backend name used in log output.
    fn provider(&self) -> &'static str;

    /// The injected collaborators for this source.
    fn context(&self) -> &SourceContext;

    /// List the remote releases, most recent first.
    ///
    /// An empty or undecodable remote answer surfaces as a
    /// "no release found" error from the callers below.
    async fn list_remote(&self) -> Result<Vec<RemoteEntry>>;

    /// File name the archive for `version` is stored under.
    fn archive_name(&self, version: &str) -> String {
        format!("{version}.zip")
    }

    /// Attach credentials to an outgoing request. Defaults to a standard
    /// bearer header; GitLab overrides this with its `PRIVATE-TOKEN` style.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.context().token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, token.bearer()),
            None => request,
        }
    }

    /// The newest version the remote offers.
    async fn latest_version(&self) -> Result<String> {
        let entries = self.list_remote().await?;
        entries
            .first()
            .map(|entry| entry.version.clone())
            .ok_or_else(|| UpdraftError::no_release_found(None).into())
    }

    /// The version an update would install: the cached detection when
    /// present, otherwise the newest remote entry.
    async fn version_available(&self) -> Result<String> {
        let cache = &self.context().cache;
        if cache.exists() {
            return cache.read().await;
        }
        self.latest_version().await
    }

    /// The statically configured installed version.
    fn version_installed(&self) -> Result<String> {
        self.context()
            .version_installed
            .clone()
            .ok_or_else(|| UpdraftError::VersionInstalledNotFound.into())
    }

    /// Whether a version newer than `current` (or the configured installed
    /// version) is available.
    ///
    /// While the cache holds a detection the remote is not contacted and no
    /// event fires. On a fresh detection the new version is cached and a
    /// single update-available event is emitted.
    async fn is_new_version_available(&self, current: Option<&str>) -> Result<bool> {
        let current = match current {
            Some(version) => version.to_string(),
            None => self.version_installed()?,
        };

        let context = self.context();
        if context.cache.exists() {
            let available = context.cache.read().await?;
            return Ok(version::is_newer(&current, &available));
        }

        let available = self.latest_version().await?;
        let newer = version::is_newer(&current, &available);

        if newer {
            context.cache.write(&available).await?;
            context.events.emit(&UpdaterEvent::UpdateAvailable {
                new_version: available,
            });
        }

        Ok(newer)
    }

    /// Resolve a release and stage it locally.
    ///
    /// With a version given, an exact listing match is used; an unmatched
    /// version falls back to the newest entry after a logged notice. The
    /// download and extraction are skipped when the release is already
    /// staged.
    async fn fetch(&self, version: Option<&str>) -> Result<Release> {
        let entries = self.list_remote().await?;
        let selected = select_release(&entries, version)
            .ok_or_else(|| UpdraftError::no_release_found(version))?;

        debug!(
            "Fetching release {} from {} source",
            selected.version,
            self.provider()
        );

        let context = self.context();
        let release = Release::new()
            .with_version(&selected.version)
            .with_archive_name(self.archive_name(&selected.version))
            .with_storage_path(&context.download_path)
            .update_storage_path()
            .with_download_url(&selected.download_url)
            .with_access_token(context.token.clone());

        if release.is_source_already_fetched() {
            debug!("Release {} is already staged", selected.version);
            return Ok(release);
        }

        release.download(&context.client).await?;
        release.extract(!context.keep_archive)?;

        Ok(release)
    }
}

/// Pick the entry matching `wanted`, falling back to the newest entry with a
/// logged notice when the wanted version is absent. `None` only for an empty
/// listing.
fn select_release<'a>(entries: &'a [RemoteEntry], wanted: Option<&str>) -> Option<&'a RemoteEntry> {
    if let Some(version) = wanted {
        if let Some(found) = entries.iter().find(|entry| entry.version == version) {
            return Some(found);
        }
        if !entries.is_empty() {
            info!("No release for version \"{version}\" found. Selecting latest.");
        }
    }
    entries.first()
}

/// Build the backend for one configured source.
///
/// GitHub sources split on their configuration: a configured branch selects
/// the branch-following backend, otherwise tags are used. Repository
/// coordinates are validated here so a broken configuration fails before any
/// network traffic.
pub fn resolve_source(
    name: &str,
    config: &SourceConfig,
    mut context: SourceContext,
) -> Result<Box<dyn SourceRepository>> {
    context.token = config.token().map(AccessToken::new);

    let source: Box<dyn SourceRepository> = match config {
        SourceConfig::Github(github) => {
            require(name, "repository_vendor", &github.repository_vendor)?;
            require(name, "repository_name", &github.repository_name)?;

            match github.branch.as_deref().filter(|branch| !branch.is_empty()) {
                Some(branch) => Box::new(GithubBranchSource::new(
                    github.repository_vendor.clone(),
                    github.repository_name.clone(),
                    branch.to_string(),
                    context,
                )),
                None => Box::new(GithubTagSource::new(
                    github.repository_vendor.clone(),
                    github.repository_name.clone(),
                    context,
                )),
            }
        }
        SourceConfig::Gitlab(gitlab) => {
            require(name, "project_id", &gitlab.project_id)?;
            Box::new(GitlabSource::new(
                gitlab.base_url.clone(),
                gitlab.project_id.clone(),
                context,
            ))
        }
        SourceConfig::Gitea(gitea) => {
            require(name, "base_url", &gitea.base_url)?;
            require(name, "repository_vendor", &gitea.repository_vendor)?;
            require(name, "repository_name", &gitea.repository_name)?;
            Box::new(GiteaSource::new(
                gitea.base_url.clone(),
                gitea.repository_vendor.clone(),
                gitea.repository_name.clone(),
                context,
            ))
        }
        SourceConfig::Http(http) => {
            require(name, "repository_url", &http.repository_url)?;
            let listing_url = url::Url::parse(&http.repository_url).map_err(|e| {
                invalid_repository(name, format!("repository_url is not a valid URL: {e}"))
            })?;
            let Some((prepend, append)) = http.filename_template.split_once("_VERSION_") else {
                return Err(invalid_repository(
                    name,
                    "filename_template must contain the _VERSION_ placeholder".to_string(),
                )
                .into());
            };
            Box::new(HttpSource::new(
                listing_url,
                prepend.to_string(),
                append.to_string(),
                context,
            ))
        }
    };

    debug!("Resolved source \"{name}\" to {} backend", source.provider());
    Ok(source)
}

fn require(source: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_repository(source, format!("{field} is not configured")).into());
    }
    Ok(())
}

fn invalid_repository(source: &str, reason: String) -> UpdraftError {
    error!("Source \"{source}\" is misconfigured: {reason}");
    UpdraftError::InvalidRepository {
        reason: format!("source \"{source}\": {reason}"),
    }
}
