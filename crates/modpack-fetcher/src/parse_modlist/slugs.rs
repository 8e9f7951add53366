//! Mod slug extraction from a saved CurseForge modlist page

use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use crate::downloader::core::{DownloadError, FileOperation, Result};

/// Project page prefix that marks a mod reference
pub const CATALOG_URL_PREFIX: &str = "https://www.curseforge.com/minecraft/mc-mods/";

/// Why a line carrying the catalog prefix could not produce a slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// No `"` after the slug
    MissingClosingQuote,
    /// Nothing between `mc-mods/` and the end of the path segment
    EmptySlug,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::MissingClosingQuote => write!(f, "link is not terminated by a quote"),
            MalformedReason::EmptySlug => write!(f, "link has no mod slug"),
        }
    }
}

/// A modlist line that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based
    pub line_number: usize,
    pub reason: MalformedReason,
}

/// Result of scanning a modlist document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugScan {
    /// Slugs in order of appearance, duplicates included
    pub slugs: Vec<String>,
    pub malformed: Vec<MalformedLine>,
}

/// Scan `text` for `https://www.curseforge.com/minecraft/mc-mods/<slug>"` links
///
/// Every occurrence on a line is read. The slug is the first path segment
/// after `mc-mods/`, so `.../mc-mods/jei/files"` yields `jei`.
pub fn extract_slugs(text: &str) -> SlugScan {
    let mut scan = SlugScan::default();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let mut rest = line;

        while let Some(start) = rest.find(CATALOG_URL_PREFIX) {
            let after = &rest[start + CATALOG_URL_PREFIX.len()..];

            let Some(end) = after.find('"') else {
                warn!("Skipping modlist line {}: link is not terminated by a quote", line_number);
                scan.malformed.push(MalformedLine {
                    line_number,
                    reason: MalformedReason::MissingClosingQuote,
                });
                break;
            };

            let slug = after[..end].split(['/', '?', '#']).next().unwrap_or_default();
            if slug.is_empty() {
                warn!("Skipping modlist line {}: link has no mod slug", line_number);
                scan.malformed.push(MalformedLine {
                    line_number,
                    reason: MalformedReason::EmptySlug,
                });
            } else {
                scan.slugs.push(slug.to_string());
            }

            rest = &after[end..];
        }
    }

    scan
}

/// Read the modlist at `path` and scan it
///
/// Bytes that are not valid UTF-8 are replaced, not rejected.
pub async fn extract_slugs_from_file(path: &Path) -> Result<SlugScan> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DownloadError::file_system(path, FileOperation::Read, e))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(extract_slugs(&text))
}

/// Drop repeated slugs, keeping the first occurrence
pub fn dedup_slugs(slugs: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    slugs.into_iter().filter(|slug| seen.insert(slug.clone())).collect()
}
