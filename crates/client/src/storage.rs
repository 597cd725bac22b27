//! Durable token storage.
//!
//! Tokens live under two fixed keys, `accessToken` and `refreshToken`. Reads
//! never fail: missing or malformed storage simply means "no token".

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sasb_auth::TokenPair;

use crate::error::StorageError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Access,
    Refresh,
}

impl TokenKey {
    pub const ALL: [TokenKey; 2] = [TokenKey::Access, TokenKey::Refresh];

    /// Storage key the token is persisted under.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::Access => "accessToken",
            TokenKey::Refresh => "refreshToken",
        }
    }
}

/// Synchronous key-value storage for the token pair.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Option<String>;
    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: TokenKey) -> Result<(), StorageError>;

    /// Both tokens, if both are stored.
    fn token_pair(&self) -> Option<TokenPair> {
        Some(TokenPair::new(
            self.get(TokenKey::Access)?,
            self.get(TokenKey::Refresh)?,
        ))
    }

    fn store_pair(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.set(TokenKey::Access, &pair.access)?;
        self.set(TokenKey::Refresh, &pair.refresh)
    }

    /// Remove both tokens. Every key is attempted even if one removal fails.
    fn clear(&self) -> Result<(), StorageError> {
        let mut first_err = None;
        for key in TokenKey::ALL {
            if let Err(err) = self.remove(key) {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// In-process store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<TokenKey, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: &TokenPair) -> Self {
        let store = Self::new();
        {
            let mut entries = store.lock();
            entries.insert(TokenKey::Access, pair.access.clone());
            entries.insert(TokenKey::Refresh, pair.refresh.clone());
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TokenKey, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Option<String> {
        self.lock().get(&key).cloned()
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: TokenKey) -> Result<(), StorageError> {
        self.lock().remove(&key);
        Ok(())
    }
}

/// Tokens persisted as a JSON object in a single file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous content intact.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

type Entries = BTreeMap<String, String>;

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Entries {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Entries::new(),
            Err(err) => {
                tracing::warn!(path = ?self.path, error = %err, "token file unreadable; treating as empty");
                return Entries::new();
            }
        };

        match serde_json::from_str::<Entries>(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = ?self.path, error = %err, "token file malformed; treating as empty");
                Entries::new()
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let encoded = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, encoded).map_err(io_err)?;
        restrict_permissions(&tmp).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut entries = self.read_entries();
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> Option<String> {
        self.read_entries()
            .remove(key.as_str())
            .filter(|token| !token.is_empty())
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
        })
    }

    /// Both keys land in the same write.
    fn store_pair(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(TokenKey::Access.as_str().to_string(), pair.access.clone());
            entries.insert(TokenKey::Refresh.as_str().to_string(), pair.refresh.clone());
        })
    }

    fn remove(&self, key: TokenKey) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key.as_str());
        })
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
