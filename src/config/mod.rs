//! Updater configuration.
//!
//! One TOML file (`updraft.toml`) describes the installation being kept up
//! to date: where it lives, which version is installed, where archives are
//! staged, which folder names must never be replaced, and a table of release
//! sources to pull from.
//!
//! # Configuration File Location
//!
//! The file is looked up in the working directory by default, next to the
//! installation it manages. The location can be overridden with the
//! `UPDRAFT_CONFIG` environment variable or the `--config` flag. A missing
//! default file yields the built-in defaults.
//!
//! # File Format
//!
//! ```toml
//! default = "stable"
//! version_installed = "2.6.0"
//! install_path = "/srv/my-app"
//! download_path = "/var/cache/my-app/releases"
//! exclude_folders = ["storage", "vendor", ".git"]
//!
//! [sources.stable]
//! type = "github"
//! repository_vendor = "acme"
//! repository_name = "my-app"
//!
//! [sources.nightly]
//! type = "github"
//! repository_vendor = "acme"
//! repository_name = "my-app"
//! branch = "main"
//!
//! [sources.mirror]
//! type = "http"
//! repository_url = "https://dl.acme.example/releases"
//! filename_template = "my-app-_VERSION_"
//! ```
//!
//! Tokens for private repositories live in the source tables (`token = "…"`)
//! and are sent as bearer credentials, or through `PRIVATE-TOKEN` for GitLab.
//! Configurations are injected into the components that need them; nothing in
//! this crate reads configuration from global state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// File name of the default configuration, resolved in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "updraft.toml";

fn default_source_name() -> String {
    "github".to_string()
}

fn default_install_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_download_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("updraft")
}

/// Folder names that stay untouched during an update unless configured
/// otherwise.
fn default_exclude_folders() -> Vec<String> {
    ["__MACOSX", "node_modules", "storage", "vendor", ".git"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Top-level updater configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Name of the source used when none is selected explicitly.
    #[serde(default = "default_source_name")]
    pub default: String,

    /// The version currently installed, when known statically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_installed: Option<String>,

    /// Root of the installed file tree an update overlays.
    #[serde(default = "default_install_path")]
    pub install_path: PathBuf,

    /// Directory release archives are downloaded and extracted into.
    #[serde(default = "default_download_path")]
    pub download_path: PathBuf,

    /// Folder names that are never replaced in the installation.
    #[serde(default = "default_exclude_folders")]
    pub exclude_folders: Vec<String>,

    /// Keep archives after extraction instead of deleting them.
    #[serde(default)]
    pub keep_archive: bool,

    /// Release sources by name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub sources: HashMap<String, SourceConfig>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            default: default_source_name(),
            version_installed: None,
            install_path: default_install_path(),
            download_path: default_download_path(),
            exclude_folders: default_exclude_folders(),
            keep_archive: false,
            sources: HashMap::new(),
        }
    }
}

/// One configured release source, tagged by backend type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// GitHub repository; follows tags, or a branch when one is configured.
    Github(GithubSourceConfig),
    /// GitLab project releases (gitlab.com or self-hosted).
    Gitlab(GitlabSourceConfig),
    /// Gitea repository releases.
    Gitea(GiteaSourceConfig),
    /// Directory-listing page serving zip archives.
    Http(HttpSourceConfig),
}

impl SourceConfig {
    /// The configured access token, if any. Empty strings count as unset so
    /// commented-out tokens left as `token = ""` do not send empty headers.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        let token = match self {
            Self::Github(config) => config.token.as_deref(),
            Self::Gitlab(config) => config.token.as_deref(),
            Self::Gitea(config) => config.token.as_deref(),
            Self::Http(config) => config.token.as_deref(),
        };
        token.filter(|token| !token.is_empty())
    }
}

/// GitHub source coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubSourceConfig {
    /// Repository owner (user or organization).
    pub repository_vendor: String,
    /// Repository name.
    pub repository_name: String,
    /// Branch to follow. Unset means releases come from tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Access token for private repositories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// GitLab source coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitlabSourceConfig {
    /// Instance base URL. Unset means gitlab.com.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Numeric project id or `vendor/name` project path.
    pub project_id: String,
    /// Access token, sent in the `PRIVATE-TOKEN` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Gitea source coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiteaSourceConfig {
    /// Base URL of the Gitea instance.
    pub base_url: String,
    /// Repository owner.
    pub repository_vendor: String,
    /// Repository name.
    pub repository_name: String,
    /// Access token for private repositories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Plain-HTTP listing source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    /// URL of the listing page the archives are linked from.
    pub repository_url: String,
    /// Archive name template containing the `_VERSION_` placeholder.
    pub filename_template: String,
    /// Access token for protected listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl UpdaterConfig {
    /// Load the configuration from its default location.
    ///
    /// Honors the `UPDRAFT_CONFIG` environment variable; otherwise reads
    /// `updraft.toml` from the working directory, falling back to defaults
    /// when the file does not exist.
    pub async fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("UPDRAFT_CONFIG") {
            return Self::load_from(Path::new(&path)).await;
        }

        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an explicit path when one is given, otherwise from the
    /// default location. An explicit path must exist.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path).await,
            None => Self::load().await,
        }
    }

    /// Load the configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration from {}", path.display()))
    }

    /// Write the configuration to a specific file, creating parent
    /// directories as needed.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;

        Ok(())
    }

    /// The source table entry to use for `name`, falling back to the
    /// configured default source.
    pub fn source_config<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a SourceConfig)> {
        let name = name.unwrap_or(&self.default);
        let config = self.sources.get(name).ok_or_else(|| {
            crate::core::UpdraftError::ConfigError {
                message: format!("Source \"{name}\" is not configured"),
            }
        })?;
        Ok((name, config))
    }
}
