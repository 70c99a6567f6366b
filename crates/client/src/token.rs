//! Bearer token persistence.
//!
//! The token is kept under a namespaced key in a small key/value store that
//! plays the role of browser local storage. [`FileTokenStore`] keeps that
//! store as a JSON object on disk and leaves unrelated keys alone.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "@casa-apoio:token";

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token storage is not a JSON object: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Token storage lock poisoned")]
    Poisoned,
}

/// Synchronous token storage, read before every outbound request.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let guard = self.token.read().map_err(|_| TokenStoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut guard = self.token.write().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut guard = self.token.write().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed
// ---------------------------------------------------------------------------

type Storage = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_storage(&self) -> Result<Storage, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Storage::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Storage::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_storage(&self, storage: &Storage) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(storage)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let storage = self.read_storage()?;
        Ok(storage
            .get(TOKEN_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut storage = self.read_storage()?;
        storage.insert(TOKEN_KEY.to_string(), serde_json::Value::from(token));
        self.write_storage(&storage)
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut storage = self.read_storage()?;
        if storage.remove(TOKEN_KEY).is_some() {
            self.write_storage(&storage)?;
        }
        Ok(())
    }
}
