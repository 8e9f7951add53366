//! Core types used throughout the downloader system
//!
//! This module contains the fundamental types that all other modules depend on.

pub mod error;
pub mod files;
pub mod http;
pub mod progress;

// Re-export main types for convenience
pub use error::{DownloadError, ErrorSeverity, FileOperation, Result};
pub use files::{file_name_from_url, sanitize_file_name};
pub use http::{HttpDownloader, SavedFile};
pub use progress::{
    ConsoleProgressReporter, IntoProgressCallback, NullProgressReporter, ProgressCallback, ProgressEvent,
    ProgressReporter,
};
