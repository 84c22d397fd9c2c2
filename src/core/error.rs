//! Error types for updraft.
//!
//! This module defines the error taxonomy used across the update pipeline,
//! built on `thiserror` for typed variants and `anyhow` for propagation with
//! context. The variants map one-to-one onto the failure classes of the
//! pipeline:
//!
//! - configuration problems (missing repository coordinates, no storage path)
//!   are fatal and surfaced immediately, without retry
//! - an empty or unparsable remote listing surfaces as [`UpdraftError::ReleaseNotFound`];
//!   the caller may retry later
//! - a missing installed version only fails the check operation
//! - archive problems fail the fetch attempt and leave the downloaded file on
//!   disk for inspection
//! - permission problems during an update run are reported through the
//!   `UpdateFailed` event rather than an error, so they never appear here
//!   unless a filesystem call itself fails
//!
//! [`user_friendly_error`] converts any [`anyhow::Error`] into an
//! [`ErrorContext`] with an actionable suggestion, which `main` renders with
//! terminal colors.

use colored::Colorize;
use std::fmt;

/// Main error type for all updraft operations.
#[derive(thiserror::Error, Debug)]
pub enum UpdraftError {
    /// Configuration file or value is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of what is wrong with the configuration
        message: String,
    },

    /// Repository coordinates (vendor/name, project id, or URL) are missing
    /// or malformed. Detected before any network call is made.
    #[error("Invalid repository configuration: {reason}")]
    InvalidRepository {
        /// Which coordinate is missing or malformed
        reason: String,
    },

    /// A release was asked to download or extract before its storage path
    /// was established.
    #[error("No storage path set")]
    StoragePathNotSet,

    /// No installed version could be resolved for the update check: none was
    /// passed in and none is configured.
    #[error("Version installed not found")]
    VersionInstalledNotFound,

    /// The remote listing was empty or could not be parsed.
    #[error("No release found for version \"{version}\". Please check the repository you're pulling from")]
    ReleaseNotFound {
        /// The requested version, or "latest version" when none was given
        version: String,
    },

    /// The directory-listing page did not contain any anchor matching the
    /// configured filename pattern.
    #[error("Could not extract a download link from the release listing (pattern: {pattern})")]
    DownloadLinkNotFound {
        /// The rendered filename pattern that failed to match
        pattern: String,
    },

    /// The downloaded archive file is gone from its expected location.
    #[error("Archive file \"{path}\" not found")]
    ArchiveFileNotFound {
        /// Expected path of the archive
        path: String,
    },

    /// The staged file does not carry a zip extension.
    #[error("Archive is not a zip file, found \"{mime}\"")]
    ArchiveNotAZipFile {
        /// Detected MIME type of the offending file
        mime: String,
    },

    /// The archive exists but could not be opened or unpacked.
    #[error("Cannot extract archive \"{path}\": {reason}")]
    ArchiveExtractFailed {
        /// Path of the archive
        path: String,
        /// Underlying zip/IO failure
        reason: String,
    },

    /// A file or directory could not be written due to permissions.
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// Path that was not writable
        path: String,
    },

    /// A remote request failed below the HTTP status level.
    #[error("Network error during {operation}: {reason}")]
    NetworkError {
        /// What was being performed (e.g. "release listing", "archive download")
        operation: String,
        /// Underlying transport failure
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("File system error: {operation} on {path}")]
    FileSystemError {
        /// What was being performed
        operation: String,
        /// Path involved
        path: String,
    },

    /// IO errors from std library operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP client errors from reqwest
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON payload errors
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

impl UpdraftError {
    /// Build a [`UpdraftError::ReleaseNotFound`] for an optional requested
    /// version, substituting "latest version" when none was given.
    #[must_use]
    pub fn no_release_found(version: Option<&str>) -> Self {
        let version = match version {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => "latest version".to_string(),
        };
        Self::ReleaseNotFound {
            version,
        }
    }
}

// IoError and HttpError hold non-cloneable sources; cloning maps them onto
// message-carrying variants instead.
impl Clone for UpdraftError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::InvalidRepository {
                reason,
            } => Self::InvalidRepository {
                reason: reason.clone(),
            },
            Self::StoragePathNotSet => Self::StoragePathNotSet,
            Self::VersionInstalledNotFound => Self::VersionInstalledNotFound,
            Self::ReleaseNotFound {
                version,
            } => Self::ReleaseNotFound {
                version: version.clone(),
            },
            Self::DownloadLinkNotFound {
                pattern,
            } => Self::DownloadLinkNotFound {
                pattern: pattern.clone(),
            },
            Self::ArchiveFileNotFound {
                path,
            } => Self::ArchiveFileNotFound {
                path: path.clone(),
            },
            Self::ArchiveNotAZipFile {
                mime,
            } => Self::ArchiveNotAZipFile {
                mime: mime.clone(),
            },
            Self::ArchiveExtractFailed {
                path,
                reason,
            } => Self::ArchiveExtractFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::PermissionDenied {
                path,
            } => Self::PermissionDenied {
                path: path.clone(),
            },
            Self::NetworkError {
                operation,
                reason,
            } => Self::NetworkError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::HttpError(e) => Self::NetworkError {
                operation: "http request".to_string(),
                reason: e.to_string(),
            },
            Self::TomlError(e) => Self::TomlError(e.clone()),
            Self::JsonError(e) => Self::Other {
                message: format!("JSON parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// An error with an optional suggestion and details for terminal display.
///
/// Wraps a [`UpdraftError`] with the user-facing context `main` prints when a
/// command fails: the error itself in red, details in yellow, a suggestion in
/// green.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The underlying error
    pub error: UpdraftError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: UpdraftError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, shown in green.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred, shown in yellow.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Recognizes [`UpdraftError`] variants and common wrapped errors
/// ([`std::io::Error`], [`toml::de::Error`]) and attaches tailored
/// suggestions; anything else is rendered with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(updraft_error) = error.downcast_ref::<UpdraftError>() {
        return create_error_context(updraft_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(UpdraftError::PermissionDenied {
                    path: "unknown".to_string(),
                })
                .with_suggestion(
                    "Check file ownership, or run with permissions matching the installation",
                )
                .with_details("A file or directory could not be read or written");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(UpdraftError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details("A required file or directory could not be found");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(UpdraftError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion(
            "Check the TOML syntax in your updraft.toml. Verify quotes, brackets, and table names",
        )
        .with_details("TOML parsing errors are usually caused by syntax issues");
    }

    // Generic error - include the full cause chain for diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(UpdraftError::Other {
        message,
    })
}

/// Map each [`UpdraftError`] variant to a context with a tailored suggestion.
fn create_error_context(error: UpdraftError) -> ErrorContext {
    match &error {
        UpdraftError::InvalidRepository { .. } => ErrorContext::new(error.clone())
            .with_suggestion(
                "Set the repository coordinates for the selected source in updraft.toml \
                 (vendor and name for github/gitea, project_id for gitlab, url for http)",
            )
            .with_details("Repository coordinates are validated before any network call is made"),

        UpdraftError::VersionInstalledNotFound => ErrorContext::new(error.clone())
            .with_suggestion(
                "Set version_installed in updraft.toml, or pass the current version explicitly",
            )
            .with_details(
                "The update check compares the installed version against the newest remote release",
            ),

        UpdraftError::ReleaseNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion(
                "Check the repository coordinates and that the repository publishes releases",
            )
            .with_details("The remote listing was empty or could not be parsed"),

        UpdraftError::DownloadLinkNotFound {
            pattern,
        } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check that the listing page links archives named like \"{pattern}\" and that \
                 filename_format matches them"
            ))
            .with_details("The HTML listing is scanned for anchors matching the filename pattern"),

        UpdraftError::ArchiveNotAZipFile { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Only zip archives are supported. Check the release's download URL")
            .with_details("The downloaded file was left in place for inspection"),

        UpdraftError::ArchiveExtractFailed { .. } => ErrorContext::new(error.clone())
            .with_suggestion("The download may be truncated or corrupt. Run `updraft clean` and fetch again")
            .with_details("The downloaded file was left in place for inspection"),

        UpdraftError::StoragePathNotSet => ErrorContext::new(error.clone())
            .with_suggestion("Set download_path in updraft.toml so releases can be staged"),

        UpdraftError::PermissionDenied {
            path,
        } => ErrorContext::new(error.clone())
            .with_suggestion(if cfg!(windows) {
                "Run as Administrator or check file permissions in File Explorer"
            } else {
                "Check file permissions with 'ls -la' and adjust ownership with chown/chmod"
            })
            .with_details(format!("Cannot write to {path}")),

        UpdraftError::NetworkError { .. } => ErrorContext::new(error.clone())
            .with_suggestion(
                "Check your internet connection and the repository host. Private repositories \
                 need an access token in the source configuration",
            ),

        _ => ErrorContext::new(error.clone()),
    }
}
