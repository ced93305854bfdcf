use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Token file name in the data directory
const TOKEN_FILE: &str = "token.json";

/// Keychain service name
const SERVICE_NAME: &str = "catalogdesk";

/// Keychain account under which the single token is stored
const TOKEN_ACCOUNT: &str = "token";

/// Durable storage for the single bearer token.
///
/// `set` and `clear` must be visible to the next `get`, in this process and
/// in later runs. `get` never fails: an unreadable backend reads as "no token".
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Which backend holds the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
}

/// Open the configured backend rooted at `data_dir`
pub fn open_token_store(backend: TokenBackend, data_dir: &Path) -> Arc<dyn TokenStore> {
    match backend {
        TokenBackend::File => Arc::new(FileTokenStore::new(data_dir.to_path_buf())),
        TokenBackend::Keyring => Arc::new(KeyringTokenStore::new()),
    }
}

// ============================================================================
// File backend
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token persisted as JSON in the application data directory
pub struct FileTokenStore {
    data_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }

    fn read(&self) -> Result<Option<StoredToken>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let stored: StoredToken =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(stored))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match self.read() {
            Ok(stored) => stored.map(|s| s.token),
            Err(e) => {
                warn!(error = %e, path = ?self.path(), "Ignoring unreadable token file");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        debug!(?path, "Token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove token file")?;
            debug!(?path, "Token removed");
        }
        Ok(())
    }
}

// ============================================================================
// Keychain backend
// ============================================================================

/// Token stored in the OS keychain
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, TOKEN_ACCOUNT).context("Failed to create keyring entry")
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Option<String> {
        let entry = match self.entry() {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Keychain unavailable");
                return None;
            }
        };
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read token from keychain");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());

        assert_eq!(store.get(), None);
        store.set("abc").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc"));
        store.clear().unwrap();
        assert_eq!(store.get(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileTokenStore::new(dir.path().to_path_buf()).set("persisted").unwrap();

        let reopened = FileTokenStore::new(dir.path().to_path_buf());
        assert_eq!(reopened.get().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileTokenStore::new(nested.clone());

        store.set("t").unwrap();
        assert!(nested.join(TOKEN_FILE).exists());
    }

    #[test]
    fn test_file_store_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        std::fs::write(store.path(), "not json").unwrap();

        assert_eq!(store.get(), None);
        // A later set overwrites the corrupt file
        store.set("fresh").unwrap();
        assert_eq!(store.get().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_file_store_clear_without_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);
        store.set("one").unwrap();
        store.set("two").unwrap();
        assert_eq!(store.get().as_deref(), Some("two"));
        store.clear().unwrap();
        assert_eq!(store.get(), None);

        assert_eq!(MemoryTokenStore::with_token("x").get().as_deref(), Some("x"));
    }

    #[test]
    fn test_backend_serde_names() {
        assert_eq!(serde_json::to_string(&TokenBackend::File).unwrap(), "\"file\"");
        let parsed: TokenBackend = serde_json::from_str("\"keyring\"").unwrap();
        assert_eq!(parsed, TokenBackend::Keyring);
        assert_eq!(TokenBackend::default(), TokenBackend::File);
    }

    #[test]
    fn test_open_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_token_store(TokenBackend::File, dir.path());
        store.set("via-trait").unwrap();
        assert_eq!(
            FileTokenStore::new(dir.path().to_path_buf()).get().as_deref(),
            Some("via-trait")
        );
    }
}
