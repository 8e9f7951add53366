//! Configuration types for the catalog client and downloader

use std::time::Duration;

/// Default CurseForge API host
pub const CURSEFORGE_API_BASE: &str = "https://api.curseforge.com";

/// CurseForge game identifier for Minecraft
pub const MINECRAFT_GAME_ID: u32 = 432;

/// Environment variable that overrides the API host
pub const API_BASE_ENV_VAR: &str = "CURSEFORGE_API_BASE";

/// Configuration for catalog lookups and downloads
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Catalog API host, without a trailing slash
    pub api_base_url: String,
    /// Game identifier passed to the search endpoint
    pub game_id: u32,
    pub user_agent: String,
    /// Request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
}

impl DownloadConfig {
    /// Default configuration with the API host taken from the environment when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var(API_BASE_ENV_VAR) {
            let base = base.trim().trim_end_matches('/');
            if !base.is_empty() {
                config.api_base_url = base.to_string();
            }
        }
        config
    }

    /// Build the shared HTTP client for this configuration
    pub fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            api_base_url: CURSEFORGE_API_BASE.to_string(),
            game_id: MINECRAFT_GAME_ID,
            user_agent: concat!("modpack-fetcher/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

/// Fluent builder for [`DownloadConfig`]
#[derive(Debug, Clone, Default)]
pub struct DownloadConfigBuilder {
    config: DownloadConfig,
}

impl DownloadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn game_id(mut self, game_id: u32) -> Self {
        self.config.game_id = game_id;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> DownloadConfig {
        self.config
    }
}
