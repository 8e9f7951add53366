//! Credential persistence backends

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use super::ApiKey;
use crate::downloader::core::{DownloadError, Result};

/// Environment variable holding the CurseForge API key
pub const API_KEY_ENV_VAR: &str = "CURSEFORGE_API_KEY";

/// Where an API key is looked up and remembered between runs
pub trait CredentialStore: Send + Sync {
    /// Return the stored raw value, if any; validation is up to the caller
    fn load(&self) -> Result<Option<String>>;

    /// Remember `key` for future runs
    fn save(&self, key: &ApiKey) -> Result<()>;

    /// Short human-readable description for log lines
    fn describe(&self) -> String;
}

/// Ephemeral store, nothing outlives the process
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    value: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw value already present
    pub fn with_value<S: Into<String>>(value: S) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }

    /// Current raw value
    pub fn current(&self) -> Option<String> {
        self.value.lock().ok().and_then(|v| v.clone())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.current())
    }

    fn save(&self, key: &ApiKey) -> Result<()> {
        let mut value = self.value.lock().map_err(|_| DownloadError::CredentialStore {
            message: "in-memory credential store lock poisoned".to_string(),
            source: None,
        })?;
        *value = Some(key.expose().to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}

/// User-scoped persistent store
///
/// The process environment is checked first. Beyond that the key lives in the
/// user environment (`HKCU\Environment`) on Windows and in a dotenv-format file
/// under the user config directory elsewhere.
#[derive(Debug, Clone)]
pub struct UserEnvironmentStore {
    var_name: String,
    file_path: PathBuf,
}

impl UserEnvironmentStore {
    /// Store for [`API_KEY_ENV_VAR`] using the platform default location
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| DownloadError::Configuration {
            message: "Could not determine the user configuration directory".to_string(),
            field: Some("config_dir".to_string()),
            suggestion: Some(format!("Set {} in the environment instead", API_KEY_ENV_VAR)),
        })?;
        Ok(Self::with_location(
            API_KEY_ENV_VAR,
            config_dir.join("modpack-fetcher").join("credentials.env"),
        ))
    }

    /// Store with an explicit variable name and credentials file
    pub fn with_location<S: Into<String>, P: Into<PathBuf>>(var_name: S, file_path: P) -> Self {
        Self {
            var_name: var_name.into(),
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_process_env(&self) -> Option<String> {
        std::env::var(&self.var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    #[cfg(windows)]
    fn load_persisted(&self) -> Result<Option<String>> {
        use winreg::RegKey;
        use winreg::enums::*;

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let env = match hkcu.open_subkey("Environment") {
            Ok(env) => env,
            Err(_) => return Ok(None),
        };

        Ok(env
            .get_value::<String, _>(&self.var_name)
            .ok()
            .filter(|v| !v.trim().is_empty()))
    }

    #[cfg(windows)]
    fn save_persisted(&self, key: &ApiKey) -> Result<()> {
        use winreg::RegKey;
        use winreg::enums::*;

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let (env, _) = hkcu.create_subkey("Environment").map_err(|e| DownloadError::CredentialStore {
            message: "Failed to open HKCU\\Environment".to_string(),
            source: Some(Box::new(e)),
        })?;
        env.set_value(&self.var_name, &key.expose().to_string())
            .map_err(|e| DownloadError::CredentialStore {
                message: format!("Failed to write {} to the user environment", self.var_name),
                source: Some(Box::new(e)),
            })
    }

    #[cfg(not(windows))]
    fn load_persisted(&self) -> Result<Option<String>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let entries = dotenv::from_path_iter(&self.file_path).map_err(|e| DownloadError::CredentialStore {
            message: format!("Failed to read {}", self.file_path.display()),
            source: Some(Box::new(e)),
        })?;

        for entry in entries {
            match entry {
                Ok((name, value)) if name == self.var_name => {
                    let value = value.trim().to_string();
                    return Ok((!value.is_empty()).then_some(value));
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping unreadable line in {}: {}", self.file_path.display(), e),
            }
        }

        Ok(None)
    }

    #[cfg(not(windows))]
    fn save_persisted(&self, key: &ApiKey) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DownloadError::CredentialStore {
                message: format!("Failed to create {}", parent.display()),
                source: Some(Box::new(e)),
            })?;
        }

        // Single quotes stop dotenv from expanding the `$` segments of the key.
        let contents = format!("{}='{}'\n", self.var_name, key.expose());
        std::fs::write(&self.file_path, contents).map_err(|e| DownloadError::CredentialStore {
            message: format!("Failed to write {}", self.file_path.display()),
            source: Some(Box::new(e)),
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            if let Err(e) = std::fs::set_permissions(&self.file_path, permissions) {
                debug!("Could not restrict permissions on {}: {}", self.file_path.display(), e);
            }
        }

        Ok(())
    }
}

impl CredentialStore for UserEnvironmentStore {
    fn load(&self) -> Result<Option<String>> {
        if let Some(value) = self.load_from_process_env() {
            debug!("Found {} in the process environment", self.var_name);
            return Ok(Some(value));
        }
        self.load_persisted()
    }

    fn save(&self, key: &ApiKey) -> Result<()> {
        self.save_persisted(key)?;
        debug!("Saved {} ({}) to {}", self.var_name, key.masked(), self.describe());
        Ok(())
    }

    fn describe(&self) -> String {
        if cfg!(windows) {
            format!("user environment variable {}", self.var_name)
        } else {
            self.file_path.display().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::tests::sample_key;
    use tempfile::tempdir;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(&sample_key()).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some(sample_key().expose()));
    }

    #[test]
    fn memory_store_can_start_with_malformed_value() {
        let store = MemoryCredentialStore::with_value("not-a-key");
        assert_eq!(store.load().unwrap().as_deref(), Some("not-a-key"));
    }

    #[cfg(not(windows))]
    #[test]
    fn file_store_persists_key_with_dollar_signs_intact() {
        let dir = tempdir().unwrap();
        let store = UserEnvironmentStore::with_location(
            "MODPACK_FETCHER_TEST_UNSET_VAR",
            dir.path().join("nested").join("credentials.env"),
        );

        assert_eq!(store.load().unwrap(), None);
        store.save(&sample_key()).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.as_deref(), Some(sample_key().expose()));
    }

    #[cfg(unix)]
    #[test]
    fn file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = UserEnvironmentStore::with_location(
            "MODPACK_FETCHER_TEST_UNSET_VAR_2",
            dir.path().join("credentials.env"),
        );
        store.save(&sample_key()).unwrap();

        let mode = std::fs::metadata(store.file_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn process_environment_takes_precedence() {
        let dir = tempdir().unwrap();
        let var = "MODPACK_FETCHER_TEST_PROCESS_KEY";
        // Unique name, no other test touches it
        unsafe {
            std::env::set_var(var, "  from-env  ");
        }

        let store = UserEnvironmentStore::with_location(var, dir.path().join("credentials.env"));
        assert_eq!(store.load().unwrap().as_deref(), Some("from-env"));

        unsafe {
            std::env::remove_var(var);
        }
    }
}
