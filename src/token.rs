//! Access tokens for authenticated release sources.

use std::fmt;

/// A repository access token.
///
/// Most backends send this as a standard `Authorization: Bearer` header;
/// GitLab instead expects the bare secret in its `PRIVATE-TOKEN` header, so
/// both spellings are available. The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
}

impl AccessToken {
    /// Wrap a token secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The value for an `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.secret)
    }

    /// The bare secret, for headers that take it undecorated.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl From<String> for AccessToken {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for AccessToken {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}
