//! CurseForge catalog client
//!
//! This module resolves a mod slug to a concrete download URL:
//! - Search the catalog for the slug to obtain the numeric mod id
//! - List the files published for that mod
//! - Pick the first file, in listing order, that supports the target version
//!
//! Every request carries the `x-api-key` header. Nothing is cached; each slug
//! costs two round trips.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::credentials::ApiKey;
use crate::downloader::config::DownloadConfig;
use crate::downloader::core::{DownloadError, Result};

/// Header carrying the CurseForge API key
const API_KEY_HEADER: &str = "x-api-key";

/// Anything that can turn a slug into a download URL for a given version
#[async_trait]
pub trait ModCatalog: Send + Sync {
    /// Resolve `slug` to the download URL of a file supporting `target_version`
    ///
    /// `Ok(None)` means the mod exists but no file matches the version.
    async fn resolve_download_url(&self, slug: &str, target_version: &str) -> Result<Option<String>>;
}

/// `{ "data": [...] }` envelope used by every CurseForge endpoint
#[derive(Debug, Clone, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

/// A mod entry returned by the search endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMod {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A file entry returned by the files endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub game_versions: Vec<String>,
    /// `null` when the author disabled third-party distribution
    #[serde(default)]
    pub download_url: Option<String>,
}

impl CatalogFile {
    /// Whether any listed game version equals `target_version` exactly
    pub fn supports_version(&self, target_version: &str) -> bool {
        self.game_versions.iter().any(|v| v == target_version)
    }
}

/// Pick the first file, in listing order, that supports `target_version`
pub fn select_file_for_version<'a>(files: &'a [CatalogFile], target_version: &str) -> Option<&'a CatalogFile> {
    files.iter().find(|file| file.supports_version(target_version))
}

/// CurseForge API client
#[derive(Clone)]
pub struct CurseForgeAPI {
    api_key: ApiKey,
    client: Client,
    base_url: String,
    game_id: u32,
}

impl std::fmt::Debug for CurseForgeAPI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurseForgeAPI")
            .field("api_key", &self.api_key.masked())
            .field("base_url", &self.base_url)
            .field("game_id", &self.game_id)
            .finish()
    }
}

impl CurseForgeAPI {
    /// Create a client with its own HTTP connection pool
    pub fn new(api_key: ApiKey, config: &DownloadConfig) -> Result<Self> {
        let client = config.build_client().map_err(|e| DownloadError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
            field: None,
            suggestion: None,
        })?;
        Ok(Self::with_client(api_key, client, config))
    }

    /// Create a client that shares an existing HTTP client
    pub fn with_client(api_key: ApiKey, client: Client, config: &DownloadConfig) -> Self {
        Self {
            api_key,
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            game_id: config.game_id,
        }
    }

    /// Look up a mod by slug, returning the first search hit
    pub async fn search_mod(&self, slug: &str) -> Result<CatalogMod> {
        let url = url::Url::parse_with_params(
            &format!("{}/v1/mods/search", self.base_url),
            &[("gameId", self.game_id.to_string()), ("slug", slug.to_string())],
        )
        .map_err(|source| DownloadError::InvalidUrl {
            url: self.base_url.clone(),
            suggestion: "The catalog base URL must be an absolute http(s) URL".to_string(),
            source,
        })?;

        let envelope: DataEnvelope<CatalogMod> = self.get_json(url.as_str(), "mod info").await?;

        envelope
            .data
            .into_iter()
            .next()
            .ok_or_else(|| DownloadError::ModNotFound { slug: slug.to_string() })
    }

    /// Get the files published for a mod, in listing order
    pub async fn get_mod_files(&self, mod_id: u64) -> Result<Vec<CatalogFile>> {
        let url = format!("{}/v1/mods/{}/files", self.base_url, mod_id);
        let envelope: DataEnvelope<CatalogFile> = self.get_json(&url, "files").await?;
        Ok(envelope.data)
    }

    /// Create an authenticated request with proper headers
    fn create_authenticated_request(&self, url: &str) -> RequestBuilder {
        self.client.get(url).header(API_KEY_HEADER, self.api_key.expose())
    }

    /// Fetch `url` and decode the body, failing on non-success status
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!("CurseForge API request: {}", url);
        let response = self.create_authenticated_request(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Failed to fetch {}: {}", what, status);
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let response_text = response.text().await?;
        debug!("CurseForge API {} response: {}", what, response_text);

        serde_json::from_str(&response_text).map_err(|source| DownloadError::ResponseDecode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ModCatalog for CurseForgeAPI {
    async fn resolve_download_url(&self, slug: &str, target_version: &str) -> Result<Option<String>> {
        let catalog_mod = self.search_mod(slug).await?;
        debug!("Resolved {} to mod id {}", slug, catalog_mod.id);

        let files = self.get_mod_files(catalog_mod.id).await?;

        match select_file_for_version(&files, target_version) {
            Some(file) => {
                if file.download_url.is_none() {
                    warn!(
                        "File {:?} of {} supports {} but has no download URL",
                        file.file_name, slug, target_version
                    );
                }
                Ok(file.download_url.clone())
            }
            None => {
                debug!("No file of {} lists version {}", slug, target_version);
                Ok(None)
            }
        }
    }
}
