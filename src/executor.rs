//! Applies a staged release onto the installed file tree.
//!
//! The executor overlays the extracted release directory onto the
//! installation root while keeping configured folder names (local storage,
//! vendored dependencies, VCS metadata) untouched at the destination.
//!
//! A run is not transactional: the pre-flight writability check is
//! best-effort, and an I/O failure after the copy passes have started leaves
//! the installation partially updated. Callers must also prevent concurrent
//! runs against one installation root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cache::VersionCache;
use crate::core::UpdraftError;
use crate::events::{EventBus, UpdaterEvent};
use crate::release::Release;
use crate::utils;

/// Replaces the installed file tree with a staged release.
pub struct UpdateExecutor {
    base_path: PathBuf,
    exclude_folders: Vec<String>,
    cache: VersionCache,
    events: EventBus,
}

impl UpdateExecutor {
    /// Create an executor for one installation root.
    #[must_use]
    pub fn new(
        base_path: impl Into<PathBuf>,
        exclude_folders: Vec<String>,
        cache: VersionCache,
        events: EventBus,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            exclude_folders,
            cache,
            events,
        }
    }

    /// The installation root this executor writes into.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Overlay the release's extracted directory onto the installation root.
    ///
    /// Runs in four stages: a writability pre-flight over every installed
    /// file, a deepest-first directory pass, a pass over the remaining files,
    /// then cleanup (staging directory and version cache). Returns `Ok(false)`
    /// when the pre-flight rejects the run; nothing has been touched in that
    /// case and a single update-failed event has fired. On success a single
    /// update-succeeded event fires.
    pub async fn run(&self, release: &Release) -> Result<bool> {
        let release_dir = release
            .extraction_dir()
            .ok_or(UpdraftError::StoragePathNotSet)?;

        if !release_dir.is_dir() {
            return Err(UpdraftError::FileSystemError {
                operation: "locating staged release".to_string(),
                path: release_dir.display().to_string(),
            }
            .into());
        }

        if let Some(blocked) = self.first_unwritable_file() {
            warn!(
                "File {} is not writable, aborting update",
                blocked.display()
            );
            self.events.emit(&UpdaterEvent::UpdateFailed {
                release: release.clone(),
            });
            return Ok(false);
        }

        self.move_directories(&release_dir)?;
        self.move_files(&release_dir)?;

        utils::remove_dir_all(&release_dir)?;
        self.cache.delete().await?;

        info!(
            "Updated installation at {} to version {}",
            self.base_path.display(),
            release.version().unwrap_or("unknown")
        );
        self.events.emit(&UpdaterEvent::UpdateSucceeded {
            release: release.clone(),
        });
        Ok(true)
    }

    /// First file under the installation root the process cannot write to.
    ///
    /// Every installed file is checked, exclusions included: an update run
    /// needs the whole tree cooperative, not just the paths it replaces.
    /// Unreadable subtrees are skipped, which keeps the check best-effort.
    fn first_unwritable_file(&self) -> Option<PathBuf> {
        WalkDir::new(&self.base_path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| {
                entry
                    .metadata()
                    .map(|metadata| metadata.permissions().readonly())
                    .unwrap_or(true)
            })
            .map(walkdir::DirEntry::into_path)
    }

    /// Deepest-first directory pass.
    ///
    /// Directories are enumerated without descending into excluded names and
    /// processed children before parents (descending path length). Each
    /// directory is copied to its place under the installation root unless
    /// one of its immediate child directories carries an excluded name, and
    /// the staged copy is drained afterwards either way.
    fn move_directories(&self, release_dir: &Path) -> Result<()> {
        let mut directories: Vec<PathBuf> = WalkDir::new(release_dir)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry))
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .map(walkdir::DirEntry::into_path)
            .collect();

        directories.sort_by_key(|path| std::cmp::Reverse(path.as_os_str().len()));

        for directory in directories {
            let relative = directory.strip_prefix(release_dir)?;
            let destination = self.base_path.join(relative);

            if self.contains_excluded_child(&directory)? {
                debug!(
                    "Not copying {} into the installation, it contains an excluded folder",
                    directory.display()
                );
            } else {
                utils::copy_dir(&directory, &destination)?;
            }

            utils::remove_dir_all(&directory)?;
        }

        Ok(())
    }

    /// Copy the files the directory pass left behind, keeping their relative
    /// paths.
    ///
    /// Only release-root files remain at this point, except for excluded
    /// folders at the root, which the walk must not descend into.
    fn move_files(&self, release_dir: &Path) -> Result<()> {
        for entry in WalkDir::new(release_dir)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry))
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(release_dir)?;
            let destination = self.base_path.join(relative);

            if let Some(parent) = destination.parent() {
                utils::ensure_dir(parent)?;
            }
            std::fs::copy(entry.path(), &destination).with_context(|| {
                format!(
                    "Failed to move {} to {}",
                    entry.path().display(),
                    destination.display()
                )
            })?;
        }

        Ok(())
    }

    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        entry.file_type().is_dir() && self.is_excluded_name(entry.file_name())
    }

    fn is_excluded_name(&self, name: &std::ffi::OsStr) -> bool {
        let name = name.to_string_lossy();
        self.exclude_folders.iter().any(|excluded| excluded == &name)
    }

    fn contains_excluded_child(&self, directory: &Path) -> Result<bool> {
        for entry in std::fs::read_dir(directory)
            .with_context(|| format!("Failed to read directory {}", directory.display()))?
        {
            let entry = entry?;
            if entry.file_type()?.is_dir() && self.is_excluded_name(&entry.file_name()) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
