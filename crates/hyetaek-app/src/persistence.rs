//! Local persistence for favorites and receipt history.
//!
//! Each collection is stored whole under its own key as a JSON array and is
//! rewritten in full on every change.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use hyetaek_core::ReceiptData;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const FAVORITES_KEY: &str = "hyetaek_on_favorites";
pub const RECEIPT_HISTORY_KEY: &str = "hyetaek_on_receipt_history";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("stored value for {key} is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let io_err = |source| PersistenceError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Write-then-rename so a crash never leaves a half-written file.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)
    }
}

/// In-process storage; contents vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the two persisted collections.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Favorited store ids; empty when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] if the stored value is not a JSON
    /// array of strings, or [`PersistenceError::Io`] on read failure.
    pub fn load_favorites(&self) -> Result<Vec<String>, PersistenceError> {
        self.load(FAVORITES_KEY)
    }

    /// Saved receipts, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] if the stored value is not a JSON
    /// array of receipts, or [`PersistenceError::Io`] on read failure.
    pub fn load_history(&self) -> Result<Vec<ReceiptData>, PersistenceError> {
        self.load(RECEIPT_HISTORY_KEY)
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError`] if serialization or the write fails.
    pub fn save_favorites(&mut self, favorites: &[String]) -> Result<(), PersistenceError> {
        self.save(FAVORITES_KEY, favorites)
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError`] if serialization or the write fails.
    pub fn save_history(&mut self, history: &[ReceiptData]) -> Result<(), PersistenceError> {
        self.save(RECEIPT_HISTORY_KEY, history)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, PersistenceError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt {
            key: key.to_string(),
            source,
        })
    }

    fn save<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(items).map_err(|source| PersistenceError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }
}
