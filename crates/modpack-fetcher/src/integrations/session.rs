//! Session identifiers, session folders and opening them for the operator

use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::downloader::core::{DownloadError, FileOperation, Result};

/// Folder under the local data directory that collects all sessions
pub const MODS_ROOT_DIR_NAME: &str = "Minecraft Mods";

/// Prefix of every session folder name
pub const SESSION_DIR_PREFIX: &str = "Modpack_";

const SESSION_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp naming one run's output folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    /// Session id for the current local time
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub fn from_naive(timestamp: NaiveDateTime) -> Self {
        Self(timestamp.format(SESSION_ID_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Modpack_<id>`
    pub fn folder_name(&self) -> String {
        format!("{}{}", SESSION_DIR_PREFIX, self.0)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `<local data dir>/Minecraft Mods`
pub fn default_output_root() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(MODS_ROOT_DIR_NAME))
        .ok_or_else(|| DownloadError::Configuration {
            message: "Could not determine the local application data directory".to_string(),
            field: Some("output_dir".to_string()),
            suggestion: Some("Pass an explicit output directory".to_string()),
        })
}

/// Create `<root>/Modpack_<id>` (and `root` itself if needed)
pub async fn create_session_folder(root: &Path, session_id: &SessionId) -> Result<PathBuf> {
    let folder = root.join(session_id.folder_name());
    tokio::fs::create_dir_all(&folder)
        .await
        .map_err(|e| DownloadError::file_system(&folder, FileOperation::CreateDir, e))?;
    debug!("Session folder ready: {}", folder.display());
    Ok(folder)
}

/// Shows a folder to the operator
pub trait FolderOpener: Send + Sync {
    fn open(&self, path: &Path) -> std::io::Result<()>;
}

/// Opens folders with the platform file browser, without waiting for it
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFolderOpener;

impl SystemFolderOpener {
    fn program() -> &'static str {
        if cfg!(windows) {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }
}

impl FolderOpener for SystemFolderOpener {
    fn open(&self, path: &Path) -> std::io::Result<()> {
        let program = Self::program();
        debug!("Opening {} with {}", path.display(), program);
        Command::new(program).arg(path).spawn().map(|_| ())
    }
}

/// Opener that does nothing, for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFolderOpener;

impl FolderOpener for NoopFolderOpener {
    fn open(&self, _path: &Path) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn fixed_id() -> SessionId {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        SessionId::from_naive(timestamp)
    }

    #[test]
    fn session_id_uses_compact_timestamp() {
        let id = fixed_id();
        assert_eq!(id.as_str(), "20240307_090542");
        assert_eq!(id.folder_name(), "Modpack_20240307_090542");
    }

    #[test]
    fn current_session_id_has_expected_shape() {
        let id = SessionId::now();
        assert_eq!(id.as_str().len(), 15);
        assert_eq!(id.as_str().as_bytes()[8], b'_');
    }

    #[tokio::test]
    async fn creates_nested_session_folder() {
        let dir = tempdir().unwrap();
        let root = dir.path().join(MODS_ROOT_DIR_NAME);

        let folder = create_session_folder(&root, &fixed_id()).await.unwrap();

        assert_eq!(folder, root.join("Modpack_20240307_090542"));
        assert!(folder.is_dir());
    }

    #[tokio::test]
    async fn existing_session_folder_is_reused() {
        let dir = tempdir().unwrap();
        let first = create_session_folder(dir.path(), &fixed_id()).await.unwrap();
        let second = create_session_folder(dir.path(), &fixed_id()).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn noop_opener_succeeds() {
        assert!(NoopFolderOpener.open(Path::new("/nowhere")).is_ok());
    }
}
