//! Gitea backend listing repository releases.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{RemoteEntry, SourceContext, SourceRepository};
use crate::core::UpdraftError;

/// Lists releases of a repository on a self-hosted Gitea instance.
pub struct GiteaSource {
    base_url: String,
    vendor: String,
    name: String,
    context: SourceContext,
}

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    tag_name: String,
    zipball_url: String,
}

impl GiteaSource {
    #[must_use]
    pub fn new(base_url: String, vendor: String, name: String, context: SourceContext) -> Self {
        Self {
            base_url,
            vendor,
            name,
            context,
        }
    }
}

#[async_trait]
impl SourceRepository for GiteaSource {
    fn provider(&self) -> &'static str {
        "gitea"
    }

    fn context(&self) -> &SourceContext {
        &self.context
    }

    async fn list_remote(&self) -> Result<Vec<RemoteEntry>> {
        let url = format!(
            "{}/api/v1/repos/{}/{}/releases",
            self.base_url.trim_end_matches('/'),
            self.vendor,
            self.name
        );
        debug!("Listing Gitea releases from {url}");

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
            .map(|release| RemoteEntry {
                version: release.tag_name,
                download_url: release.zipball_url,
            })
            .collect())
    }
}
