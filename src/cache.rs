//! On-disk cache of the last detected available version.
//!
//! A single well-known file under the download root. Its existence means "a
//! newer version was already detected and announced", which is what keeps the
//! update-available event from firing on every check. The file is removed
//! after a successful update, or explicitly to force a fresh remote check.
//! There is no locking; the last writer wins.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

/// File name of the cache entry inside the download root.
const CACHE_FILE: &str = ".version-available";

/// Single-value store for the detected available version.
#[derive(Debug, Clone)]
pub struct VersionCache {
    path: PathBuf,
}

impl VersionCache {
    /// Create a cache rooted at the given download directory.
    #[must_use]
    pub fn new(download_root: impl AsRef<Path>) -> Self {
        Self {
            path: download_root.as_ref().join(CACHE_FILE),
        }
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a version has already been recorded.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Record a detected version, creating the download root if needed.
    pub async fn write(&self, version: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
        }

        fs::write(&self.path, version)
            .await
            .with_context(|| format!("Failed to write version cache {}", self.path.display()))?;

        debug!("Cached available version {version}");
        Ok(())
    }

    /// The recorded version, trimmed of surrounding whitespace.
    pub async fn read(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read version cache {}", self.path.display()))?;

        Ok(content.trim().to_string())
    }

    /// Remove the cache entry. Does nothing when no version is recorded.
    pub async fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .with_context(|| format!("Failed to remove version cache {}", self.path.display()))?;
            debug!("Cleared version cache");
        }
        Ok(())
    }
}
