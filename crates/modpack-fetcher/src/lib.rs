//! Modpack Fetcher Library
//!
//! Downloads the mods of a CurseForge modpack export. The modlist page
//! (`modlist.html`) names the mods, the sibling `manifest.json` names the
//! Minecraft version, and the CurseForge API supplies a download link per
//! mod. Files land in a fresh `Modpack_<timestamp>` folder.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use modpack_fetcher::{ApiKey, ModlistDownloadBuilder, ProgressEvent};
//!
//! # async fn example() -> modpack_fetcher::Result<()> {
//! let api_key = ApiKey::parse("$2a$10$...")?;
//!
//! let result = ModlistDownloadBuilder::new("/packs/MyPack/modlist.html")
//!     .api_key(api_key)
//!     .open_folder(false)
//!     .with_progress(|event| {
//!         if let ProgressEvent::DownloadComplete { slug, size, .. } = event {
//!             println!("{}: {} bytes", slug, size);
//!         }
//!     })
//!     .download()
//!     .await?;
//!
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Manifest-driven**: the pack's Minecraft version selects each mod's file
//! - **Per-mod isolation**: a missing or failing mod never stops the run
//! - **Credential stores**: API key from the environment, a user store, or a prompt
//! - **Progress events**: console reporter or custom callbacks
//! - **Async/await**: Full async support with Tokio runtime

pub mod credentials;
pub mod downloader;
pub mod integrations;
pub mod parse_modlist;

// Re-export commonly used types for convenience
pub use credentials::{ApiKey, CredentialStore, MemoryCredentialStore, UserEnvironmentStore, API_KEY_ENV_VAR};
pub use downloader::{
    ConsoleProgressReporter, CurseForgeAPI, DownloadConfig, DownloadConfigBuilder, DownloadError, HttpDownloader,
    ModCatalog, ProgressCallback, ProgressEvent, ProgressReporter, Result,
};
pub use integrations::{
    ConsolePrompter, InputResolver, ModOutcome, ModlistDownloadBuilder, ModlistDownloadResult, SessionId,
};
pub use parse_modlist::{extract_slugs, ModpackManifest};
