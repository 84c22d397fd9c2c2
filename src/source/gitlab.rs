//! GitLab backend listing project releases.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{RemoteEntry, SourceContext, SourceRepository};
use crate::core::UpdraftError;

const GITLAB_BASE: &str = "https://gitlab.com";

/// Lists releases of a GitLab project, on gitlab.com or a self-hosted
/// instance. The project is addressed by numeric id or by its URL-encoded
/// `vendor/name` path.
pub struct GitlabSource {
    base_url: String,
    project_id: String,
    context: SourceContext,
}

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    tag_name: String,
    assets: ReleaseAssets,
}

#[derive(Debug, Deserialize)]
struct ReleaseAssets {
    #[serde(default)]
    sources: Vec<AssetSource>,
}

#[derive(Debug, Deserialize)]
struct AssetSource {
    url: String,
}

impl GitlabSource {
    #[must_use]
    pub fn new(base_url: Option<String>, project_id: String, context: SourceContext) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| GITLAB_BASE.to_string()),
            project_id,
            context,
        }
    }

    /// Project path segments must be percent-encoded for the projects API.
    fn encoded_project_id(&self) -> String {
        self.project_id.replace('/', "%2F")
    }
}

#[async_trait]
impl SourceRepository for GitlabSource {
    fn provider(&self) -> &'static str {
        "gitlab"
    }

    fn context(&self) -> &SourceContext {
        &self.context
    }

    /// GitLab authenticates with the bare token in a `PRIVATE-TOKEN` header.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.context.token {
            Some(token) => request.header("PRIVATE-TOKEN", token.raw()),
            None => request,
        }
    }

    async fn list_remote(&self) -> Result<Vec<RemoteEntry>> {
        let url = format!(
            "{}/api/v4/projects/{}/releases",
            self.base_url.trim_end_matches('/'),
            self.encoded_project_id()
        );
        debug!("Listing GitLab releases from {url}");

        let response = self
            .authorize(self.context.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to list releases from {url}"))?
            .error_for_status()
            .with_context(|| format!("Release listing request to {url} was rejected"))?;

        let releases: Vec<ReleaseEntry> = response.json().await.map_err(|e| {
            debug!("Undecodable release listing from {url}: {e}");
            UpdraftError::no_release_found(None)
        })?;

        Ok(releases
            .into_iter()
            .filter_map(|release| match release.assets.sources.into_iter().next() {
                Some(source) => Some(RemoteEntry {
                    version: release.tag_name,
                    download_url: source.url,
                }),
                None => {
                    warn!("Release {} has no source archives, skipping", release.tag_name);
                    None
                }
            })
            .collect())
    }
}
