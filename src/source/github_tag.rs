//! GitHub backend following repository tags.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{RemoteEntry, SourceContext, SourceRepository};
use crate::core::UpdraftError;

const GITHUB_API: &str = "https://api.github.com";

/// Treats every tag of a GitHub repository as a release; the archive is the
/// zipball GitHub serves for the tag.
pub struct GithubTagSource {
    vendor: String,
    name: String,
    api_base: String,
    context: SourceContext,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
    zipball_url: String,
}

impl GithubTagSource {
    #[must_use]
    pub fn new(vendor: String, name: String, context: SourceContext) -> Self {
        Self {
            vendor,
            name,
            api_base: GITHUB_API.to_string(),
            context,
        }
    }

    /// Point the source at a different API host (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl SourceRepository for GithubTagSource {
    fn provider(&self) -> &'static str {
        "github-tag"
    }

    fn context(&self) -> &SourceContext {
        &self.context
    }

    async fn list_remote(&self) -> Result<Vec<RemoteEntry>> {
        let url = format!(
            "{}/repos/{}/{}/tags",
            self.api_base.trim_end_matches('/'),
            self.vendor,
            self.name
        );
        debug!("Listing GitHub tags from {url}");

        let response = self
            .authorize(self.context.client.get(&url))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .with_context(|| format!("Failed to list tags from {url}"))?
            .error_for_status()
            .with_context(|| format!("Tag listing request to {url} was rejected"))?;

        let tags: Vec<TagEntry> = response.json().await.map_err(|e| {
            debug!("Undecodable tag listing from {url}: {e}");
            UpdraftError::no_release_found(None)
        })?;

        Ok(tags
            .into_iter()
            .map(|tag| RemoteEntry {
                version: tag.name,
                download_url: tag.zipball_url,
            })
            .collect())
    }
}
