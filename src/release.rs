//! Release lifecycle: one remote archive from download to staged directory.
//!
//! A [`Release`] is plain data describing a single downloadable archive. The
//! source backends populate it from their listings, then `download` streams
//! the archive to the download root and `extract` unpacks it into its
//! canonical directory (the archive path minus the `.zip` suffix), collapsing
//! the single wrapper folder that forge zipballs put around their contents.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::UpdraftError;
use crate::token::AccessToken;
use crate::utils;

/// A single release archive and where it lives locally.
///
/// Built with consuming setters; all fields start unset. The storage path is
/// first set to the download root and becomes the full archive path once
/// [`Release::update_storage_path`] runs with a known archive name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Release {
    version: Option<String>,
    archive_name: Option<String>,
    storage_path: Option<PathBuf>,
    download_url: Option<String>,
    access_token: Option<AccessToken>,
}

impl Release {
    /// An empty release with no fields set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version label this release carries.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the archive file name (usually `{version}.zip`).
    #[must_use]
    pub fn with_archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = Some(name.into());
        self
    }

    /// Set the storage path. Callers pass the download root here and then
    /// call [`Release::update_storage_path`] once the archive name is known.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Set the URL the archive is downloaded from.
    #[must_use]
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    /// Attach an access token for authenticated downloads.
    #[must_use]
    pub fn with_access_token(mut self, token: Option<AccessToken>) -> Self {
        self.access_token = token;
        self
    }

    /// Append the archive name to the storage path, turning the download
    /// root into the full archive path. Does nothing while the archive name
    /// is still unknown.
    #[must_use]
    pub fn update_storage_path(mut self) -> Self {
        if let Some(name) = &self.archive_name
            && let Some(root) = self.storage_path.take()
        {
            self.storage_path = Some(root.join(name));
        }
        self
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn archive_name(&self) -> Option<&str> {
        self.archive_name.as_deref()
    }

    #[must_use]
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// The canonical directory this release extracts into: the storage path
    /// with its `.zip` suffix removed. `None` until the storage path points
    /// at the archive file.
    #[must_use]
    pub fn extraction_dir(&self) -> Option<PathBuf> {
        self.storage_path
            .as_ref()
            .map(|path| path.with_extension(""))
    }

    /// Whether this release is already staged locally, either as the archive
    /// file or as its extracted canonical directory.
    #[must_use]
    pub fn is_source_already_fetched(&self) -> bool {
        let archive_present = self.storage_path.as_ref().is_some_and(|p| p.exists());
        let extracted_present = self.extraction_dir().is_some_and(|p| p.exists());

        archive_present || extracted_present
    }

    /// Stream the archive from its download URL to the storage path.
    ///
    /// Sends `Authorization: Bearer` when a token is attached. Creates the
    /// storage directory when it does not exist yet.
    pub async fn download(&self, client: &reqwest::Client) -> Result<()> {
        let storage_path = self
            .storage_path
            .as_ref()
            .ok_or(UpdraftError::StoragePathNotSet)?;

        let url = self.download_url.as_ref().ok_or_else(|| {
            UpdraftError::ConfigError {
                message: "No download URL set for release".to_string(),
            }
        })?;

        if let Some(parent) = storage_path.parent() {
            utils::ensure_dir(parent)?;
        }

        debug!("Downloading {url} to {}", storage_path.display());

        let mut request = client.get(url);
        if let Some(token) = &self.access_token {
            request = request.header(reqwest::header::AUTHORIZATION, token.bearer());
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to request release archive from {url}"))?
            .error_for_status()
            .with_context(|| format!("Release archive request to {url} was rejected"))?;

        let mut file = tokio::fs::File::create(storage_path)
            .await
            .with_context(|| format!("Failed to create archive file {}", storage_path.display()))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read release download stream")?;
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write archive {}", storage_path.display()))?;
        }
        file.flush()
            .await
            .with_context(|| format!("Failed to flush archive {}", storage_path.display()))?;

        debug!("Downloaded release archive to {}", storage_path.display());
        Ok(())
    }

    /// Unpack the downloaded archive into its canonical directory.
    ///
    /// The archive must carry a `.zip` extension (case-insensitive); anything
    /// else fails naming the detected MIME type. A zero-byte file is treated
    /// as an empty archive, which keeps interrupted or mocked downloads from
    /// wedging the pipeline. When the archive wraps everything in exactly one
    /// top-level folder, that wrapper is collapsed so the canonical directory
    /// holds the release tree directly. The archive file is deleted
    /// afterwards unless `delete_source` is false.
    pub fn extract(&self, delete_source: bool) -> Result<()> {
        let storage_path = self
            .storage_path
            .as_ref()
            .ok_or(UpdraftError::StoragePathNotSet)?;

        if !storage_path.exists() {
            return Err(UpdraftError::ArchiveFileNotFound {
                path: storage_path.display().to_string(),
            }
            .into());
        }

        let is_zip = storage_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if !is_zip {
            return Err(UpdraftError::ArchiveNotAZipFile {
                mime: detect_mime(storage_path),
            }
            .into());
        }

        let target = storage_path.with_extension("");
        utils::ensure_dir(&target)?;

        let metadata = storage_path
            .metadata()
            .with_context(|| format!("Failed to inspect archive {}", storage_path.display()))?;

        if metadata.len() == 0 {
            warn!(
                "Archive {} is empty, staging an empty release",
                storage_path.display()
            );
        } else {
            self.unpack_zip(storage_path, &target)?;
            promote_single_subfolder(&target)?;
        }

        if delete_source {
            utils::remove_file(storage_path)?;
            debug!("Deleted archive {}", storage_path.display());
        }

        debug!("Extracted release into {}", target.display());
        Ok(())
    }

    fn unpack_zip(&self, archive_path: &Path, target: &Path) -> Result<()> {
        let file = File::open(archive_path)
            .with_context(|| format!("Failed to open archive {}", archive_path.display()))?;

        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| UpdraftError::ArchiveExtractFailed {
                path: archive_path.display().to_string(),
                reason: e.to_string(),
            })?;

        for index in 0..archive.len() {
            let mut entry =
                archive
                    .by_index(index)
                    .map_err(|e| UpdraftError::ArchiveExtractFailed {
                        path: archive_path.display().to_string(),
                        reason: e.to_string(),
                    })?;

            // Entries escaping the target directory are dropped.
            let Some(relative) = entry.enclosed_name() else {
                warn!("Skipping archive entry with unsafe path: {}", entry.name());
                continue;
            };
            let outpath = target.join(relative);

            if entry.is_dir() {
                utils::ensure_dir(&outpath)?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                utils::ensure_dir(parent)?;
            }

            let mut outfile = File::create(&outpath)
                .with_context(|| format!("Failed to create file {}", outpath.display()))?;
            std::io::copy(&mut entry, &mut outfile)
                .with_context(|| format!("Failed to write file {}", outpath.display()))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::fs::Permissions;
                use std::os::unix::fs::PermissionsExt;

                std::fs::set_permissions(&outpath, Permissions::from_mode(mode))
                    .with_context(|| format!("Failed to set permissions on {}", outpath.display()))?;
            }
        }

        Ok(())
    }
}

/// Best-effort MIME detection for the "not a zip" error message.
fn detect_mime(path: &Path) -> String {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return "application/octet-stream".to_string(),
    };

    if bytes.is_empty() {
        "application/x-empty".to_string()
    } else if bytes.starts_with(b"PK") {
        "application/zip".to_string()
    } else if std::str::from_utf8(&bytes).is_ok() {
        "text/plain".to_string()
    } else {
        "application/octet-stream".to_string()
    }
}

/// Collapse a single wrapping folder so the release tree sits directly in
/// `target`. Forge zipballs name their wrapper after the repo and commit,
/// which is noise the update executor should never see.
fn promote_single_subfolder(target: &Path) -> Result<()> {
    let entries: Vec<_> = std::fs::read_dir(target)
        .with_context(|| format!("Failed to read extracted directory {}", target.display()))?
        .collect::<std::io::Result<_>>()?;

    if entries.len() != 1 {
        return Ok(());
    }

    let wrapper = entries[0].path();
    if !wrapper.is_dir() {
        return Ok(());
    }

    debug!("Promoting wrapper folder {}", wrapper.display());

    for child in std::fs::read_dir(&wrapper)
        .with_context(|| format!("Failed to read wrapper directory {}", wrapper.display()))?
    {
        let child = child?;
        let destination = target.join(child.file_name());
        std::fs::rename(child.path(), &destination).with_context(|| {
            format!(
                "Failed to move {} to {}",
                child.path().display(),
                destination.display()
            )
        })?;
    }

    std::fs::remove_dir(&wrapper)
        .with_context(|| format!("Failed to remove wrapper directory {}", wrapper.display()))?;

    Ok(())
}
