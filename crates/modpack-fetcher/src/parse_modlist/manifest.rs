//! CurseForge modpack `manifest.json` reader
//!
//! Only `minecraft.version` is required. Pack name, version, author and mod
//! loaders are read when present so the run can report them.

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::downloader::core::{DownloadError, FileOperation, Result};

/// File name of the manifest expected next to the modlist
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// The parts of a CurseForge modpack manifest this tool cares about
///
/// Fields are kept untyped so a value of an unexpected type reads as
/// "absent" instead of failing the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModpackManifest {
    #[serde(default)]
    minecraft: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    author: Option<Value>,
}

/// A `minecraft.modLoaders` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModLoader {
    pub id: Option<String>,
    pub primary: bool,
}

impl ModpackManifest {
    /// Parse manifest JSON; `path` is only used for error context
    pub fn parse(json: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| DownloadError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse the manifest at `path`
    pub async fn load(path: &Path) -> Result<Self> {
        let json = match tokio::fs::read_to_string(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DownloadError::ManifestNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(DownloadError::file_system(path, FileOperation::Read, e)),
        };

        debug!("Read {} bytes of manifest from {}", json.len(), path.display());
        Self::parse(&json, path)
    }

    /// `minecraft.version` exactly as written, when it is a non-empty string
    pub fn target_version(&self) -> Option<&str> {
        self.minecraft
            .as_ref()
            .and_then(|mc| mc.get("version"))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }

    /// The pack's own version, not the Minecraft version
    pub fn pack_version(&self) -> Option<&str> {
        self.version.as_ref().and_then(Value::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_ref().and_then(Value::as_str)
    }

    /// Readable `minecraft.modLoaders` entries; anything else is skipped
    pub fn mod_loaders(&self) -> Vec<ModLoader> {
        self.minecraft
            .as_ref()
            .and_then(|mc| mc.get("modLoaders"))
            .and_then(Value::as_array)
            .map(|loaders| {
                loaders
                    .iter()
                    .filter(|entry| entry.is_object())
                    .map(|entry| ModLoader {
                        id: entry.get("id").and_then(Value::as_str).map(str::to_string),
                        primary: entry.get("primary").and_then(Value::as_bool).unwrap_or(false),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Id of the primary mod loader, falling back to the first listed one
    pub fn primary_loader(&self) -> Option<String> {
        let loaders: Vec<ModLoader> = self
            .mod_loaders()
            .into_iter()
            .filter(|loader| loader.id.is_some())
            .collect();
        loaders
            .iter()
            .find(|loader| loader.primary)
            .or_else(|| loaders.first())
            .and_then(|loader| loader.id.clone())
    }
}

/// Location of the manifest that accompanies a modlist file
pub fn manifest_path_for(modlist_path: &Path) -> PathBuf {
    match modlist_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(MANIFEST_FILE_NAME),
        _ => PathBuf::from(MANIFEST_FILE_NAME),
    }
}

/// Read the target version from the manifest at `path`
pub async fn read_target_version(path: &Path) -> Result<String> {
    let manifest = ModpackManifest::load(path).await?;
    manifest
        .target_version()
        .map(str::to_string)
        .ok_or_else(|| DownloadError::ManifestMissingVersion {
            path: path.to_path_buf(),
        })
}
