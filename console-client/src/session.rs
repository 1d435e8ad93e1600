//! Credential storage and the injected session context
//!
//! The bearer credential lives in exactly one storage slot, keyed by
//! [`CREDENTIAL_KEY`]. Every outgoing request reads it; only login, logout
//! and guard-triggered invalidation write or clear it. Writes are broadcast
//! through a watch channel so mounted guards can re-evaluate.

use crate::error::StorageError;
use http::HeaderValue;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Storage key holding the bearer credential
pub const CREDENTIAL_KEY: &str = "admin_token";

/// Synchronous storage for the bearer credential
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Current credential, if any
    fn load(&self) -> Option<String>;

    /// Replace the stored credential
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the stored credential; removing nothing is not an error
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-process credential slot
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

/// Plain-text credential file under a directory
///
/// The file is named after [`CREDENTIAL_KEY`] and holds only the token.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CREDENTIAL_KEY),
        }
    }

    /// Location of the credential file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a reader never sees a half-written token
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, token)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session handle injected into the request client and the guard
///
/// Cheap to clone; all clones share the same store and change channel.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn CredentialStore>,
    changes: Arc<watch::Sender<Option<String>>>,
}

impl SessionContext {
    pub fn new(store: impl CredentialStore + 'static) -> Self {
        let current = store.load();
        let (tx, _rx) = watch::channel(current);
        Self {
            store: Arc::new(store),
            changes: Arc::new(tx),
        }
    }

    /// Session over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(MemoryCredentialStore::new())
    }

    /// The stored credential, read fresh from the store
    pub fn credential(&self) -> Option<String> {
        self.store.load()
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    /// Persist a credential and notify watchers if the value changed
    pub fn set_credential(&self, token: &str) -> Result<(), StorageError> {
        if HeaderValue::from_str(&format!("Bearer {token}")).is_err() || token.trim().is_empty() {
            return Err(StorageError::InvalidToken);
        }
        self.store.save(token)?;
        self.publish(Some(token.to_string()));
        Ok(())
    }

    /// Remove the credential and notify watchers if one was present
    pub fn clear_credential(&self) -> Result<(), StorageError> {
        self.store.clear()?;
        self.publish(None);
        Ok(())
    }

    /// Clear the credential only if it is still `expected`
    ///
    /// Returns whether it was cleared. A credential replaced by a newer
    /// login while a check was in flight is left alone.
    pub fn clear_credential_if(&self, expected: &str) -> Result<bool, StorageError> {
        if self.credential().as_deref() != Some(expected) {
            return Ok(false);
        }
        self.clear_credential()?;
        Ok(true)
    }

    /// Receiver that yields whenever the credential value changes
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.changes.subscribe()
    }

    fn publish(&self, value: Option<String>) {
        self.changes.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the token itself
        f.debug_struct("SessionContext")
            .field("has_credential", &self.has_credential())
            .finish()
    }
}
