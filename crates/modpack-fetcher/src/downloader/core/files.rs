//! File operation utilities
//!
//! File naming for downloaded mods plus the temp-file-then-rename write path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::downloader::core::{DownloadError, FileOperation, Result};

/// Characters rejected by at least one mainstream filesystem.
///
/// The session folder may be copied between machines, so the Windows set is
/// applied everywhere.
const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Fallback name when a URL has no usable trailing segment
const DEFAULT_FILE_NAME: &str = "downloaded_file";

/// Replace every filesystem-invalid character with `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Derive a sanitized file name from the last path segment of a URL
///
/// The segment is kept percent-encoded, as it appears in the URL path.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url).map_err(|source| DownloadError::InvalidUrl {
        url: url.to_string(),
        suggestion: "Download URLs must be absolute http(s) URLs".to_string(),
        source,
    })?;

    let name = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME);

    Ok(sanitize_file_name(name))
}

/// Create a temporary file path for an in-flight download
///
/// The full file name is kept so `a.jar` and `a.zip` never share a temp file.
pub fn create_temp_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DEFAULT_FILE_NAME));
    name.push(".part");
    dest_path.with_file_name(name)
}

/// Rename a finished temp file onto its final destination
///
/// An existing file at `dest_path` is replaced.
pub async fn atomic_rename(temp_path: &Path, dest_path: &Path) -> Result<()> {
    fs::rename(temp_path, dest_path)
        .await
        .map_err(|e| DownloadError::file_system(dest_path, FileOperation::Move, e))?;
    debug!("Renamed {} to {}", temp_path.display(), dest_path.display());
    Ok(())
}
