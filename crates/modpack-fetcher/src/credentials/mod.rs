//! CurseForge API key handling
//!
//! [`ApiKey`] only exists for strings that match the CurseForge key format
//! (`$2a$NN$` followed by at least 53 characters of `[A-Za-z0-9./]`).
//! Where a key lives between runs is decided by a [`CredentialStore`].

pub mod store;

pub use store::{CredentialStore, MemoryCredentialStore, UserEnvironmentStore, API_KEY_ENV_VAR};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::downloader::core::{DownloadError, Result};

static API_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$2a\$[0-9]{2}\$[A-Za-z0-9./]{53,}$").expect("API key pattern is a valid regex")
});

/// A structurally valid CurseForge API key
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate `raw` exactly as given and wrap it
    ///
    /// Callers reading from prompts or files trim first.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(DownloadError::InvalidApiKey {
                reason: "the key is empty".to_string(),
            });
        }

        if !raw.starts_with("$2a$") {
            return Err(DownloadError::InvalidApiKey {
                reason: "the key must start with $2a$".to_string(),
            });
        }

        if !API_KEY_PATTERN.is_match(raw) {
            return Err(DownloadError::InvalidApiKey {
                reason: "expected $2a$NN$ followed by at least 53 characters of A-Z, a-z, 0-9, '.' or '/'"
                    .to_string(),
            });
        }

        Ok(Self(raw.to_string()))
    }

    /// Whether `raw` would be accepted by [`ApiKey::parse`]
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// The raw key, for request headers and persistence only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A log-safe rendering that keeps only the first and last four characters
    pub fn masked(&self) -> String {
        if self.0.len() <= 8 {
            return "********".to_string();
        }
        let head = &self.0[..4];
        let tail = &self.0[self.0.len() - 4..];
        format!("{head}…{tail}")
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

impl std::str::FromStr for ApiKey {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
