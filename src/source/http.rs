//! Plain-HTTP backend scraping a directory listing for release archives.
//!
//! Works against any web server that renders an index page with anchors to
//! the archive files. Archive names follow a configured template around a
//! `_VERSION_` placeholder, e.g. `my-app-_VERSION_` matching
//! `my-app-2.6.1.zip`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use super::{RemoteEntry, SourceContext, SourceRepository};
use crate::core::UpdraftError;
use crate::version::Version;

/// Scrapes a directory-listing page for versioned zip archives.
pub struct HttpSource {
    listing_url: Url,
    prepend: String,
    append: String,
    context: SourceContext,
}

impl HttpSource {
    #[must_use]
    pub fn new(mut listing_url: Url, prepend: String, append: String, context: SourceContext) -> Self {
        // Relative hrefs resolve against the listing directory itself.
        if !listing_url.path().ends_with('/') {
            let path = format!("{}/", listing_url.path());
            listing_url.set_path(&path);
        }

        Self {
            listing_url,
            prepend,
            append,
            context,
        }
    }

    fn anchor_pattern(&self) -> String {
        format!(
            r#"(?i)<a[^>]*href="(?P<href>[^"]*?{}(?P<version>\d+\.\d+\.\d+){}\.zip)"[^>]*>"#,
            regex::escape(&self.prepend),
            regex::escape(&self.append),
        )
    }

    /// Pull versioned archive links out of a listing page, newest first.
    fn scrape(&self, body: &str) -> Result<Vec<RemoteEntry>> {
        let pattern = self.anchor_pattern();
        let matcher = Regex::new(&pattern).context("Failed to build listing matcher")?;

        let mut entries = Vec::new();
        for captures in matcher.captures_iter(body) {
            let href = &captures["href"];
            let version = captures["version"].to_string();

            match self.listing_url.join(href) {
                Ok(resolved) => entries.push(RemoteEntry {
                    version,
                    download_url: resolved.to_string(),
                }),
                Err(e) => warn!("Skipping unresolvable archive link {href}: {e}"),
            }
        }

        if entries.is_empty() {
            return Err(UpdraftError::DownloadLinkNotFound {
                pattern,
            }
            .into());
        }

        entries.sort_by(|a, b| Version::parse(&b.version).cmp(&Version::parse(&a.version)));
        entries.dedup_by(|a, b| a.version == b.version);

        Ok(entries)
    }
}

#[async_trait]
impl SourceRepository for HttpSource {
    fn provider(&self) -> &'static str {
        "http"
    }

    fn context(&self) -> &SourceContext {
        &self.context
    }

    /// Archives keep the listing's decorated file names.
    fn archive_name(&self, version: &str) -> String {
        format!("{}{version}{}.zip", self.prepend, self.append)
    }

    async fn list_remote(&self) -> Result<Vec<RemoteEntry>> {
        let url = self.listing_url.as_str();
        debug!("Scraping release listing from {url}");

        let body = self
            .authorize(self.context.client.get(url))
            .send()
            .await
            .with_context(|| format!("Failed to load release listing from {url}"))?
            .error_for_status()
            .with_context(|| format!("Release listing request to {url} was rejected"))?
            .text()
            .await
            .with_context(|| format!("Failed to read release listing from {url}"))?;

        self.scrape(&body)
    }
}
