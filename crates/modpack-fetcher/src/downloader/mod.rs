//! Downloader module
//!
//! Catalog lookups, configuration and the HTTP downloader.

pub mod api;
pub mod config;
pub mod core;

// Re-export main types for convenience
pub use api::{CatalogFile, CatalogMod, CurseForgeAPI, ModCatalog};
pub use config::{DownloadConfig, DownloadConfigBuilder};
pub use self::core::{
    ConsoleProgressReporter, DownloadError, ErrorSeverity, FileOperation, HttpDownloader, IntoProgressCallback,
    NullProgressReporter, ProgressCallback, ProgressEvent, ProgressReporter, Result, SavedFile,
};
