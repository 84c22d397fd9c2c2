//! GitHub backend following the head of a branch.
//!
//! Every commit on the configured branch counts as a release. The commit
//! author date serves as the version label: ISO-8601 timestamps compare
//! chronologically, so "newer" falls out of the ordinary version ordering.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{RemoteEntry, SourceContext, SourceRepository};
use crate::core::UpdraftError;

const GITHUB_API: &str = "https://api.github.com";
const GITHUB_ARCHIVE: &str = "https://github.com";

/// Follows a GitHub branch; the archive is the snapshot zip for the commit.
pub struct GithubBranchSource {
    vendor: String,
    name: String,
    branch: String,
    api_base: String,
    archive_base: String,
    context: SourceContext,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: String,
}

impl GithubBranchSource {
    #[must_use]
    pub fn new(vendor: String, name: String, branch: String, context: SourceContext) -> Self {
        Self {
            vendor,
            name,
            branch,
            api_base: GITHUB_API.to_string(),
            archive_base: GITHUB_ARCHIVE.to_string(),
            context,
        }
    }

    /// Point the source at a different API host (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Point archive downloads at a different host.
    #[must_use]
    pub fn with_archive_base(mut self, archive_base: impl Into<String>) -> Self {
        self.archive_base = archive_base.into();
        self
    }
}

#[async_trait]
impl SourceRepository for GithubBranchSource {
    fn provider(&self) -> &'static str {
        "github-branch"
    }

    fn context(&self) -> &SourceContext {
        &self.context
    }

    /// Commit dates carry `:` characters, which make poor file names.
    fn archive_name(&self, version: &str) -> String {
        format!("{}.zip", version.replace(':', "-"))
    }

    async fn list_remote(&self) -> Result<Vec<RemoteEntry>> {
        let url = format!(
            "{}/repos/{}/{}/commits?sha={}",
            self.api_base.trim_end_matches('/'),
            self.vendor,
            self.name,
            self.branch
        );
        debug!("Listing commits on branch {} from {url}", self.branch);

        let response = self
            .authorize(self.context.client.get(&url))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .with_context(|| format!("Failed to list commits from {url}"))?
            .error_for_status()
            .with_context(|| format!("Commit listing request to {url} was rejected"))?;

        let commits: Vec<CommitEntry> = response.json().await.map_err(|e| {
            debug!("Undecodable commit listing from {url}: {e}");
            UpdraftError::no_release_found(None)
        })?;

        let archive_base = self.archive_base.trim_end_matches('/');
        Ok(commits
            .into_iter()
            .map(|entry| RemoteEntry {
                version: entry.commit.author.date,
                download_url: format!(
                    "{archive_base}/{}/{}/archive/{}.zip",
                    self.vendor, self.name, entry.sha
                ),
            })
            .collect())
    }
}
