//! Local key/value persistence for the stores.
//!
//! The storefront keeps every store in its own key of a flat string map, the
//! same shape as browser local storage. [`Storage`] is the capability the
//! stores call; [`MemoryStorage`] backs tests and ephemeral sessions and
//! [`FileStorage`] keeps one JSON file per key in a directory.
//!
//! Stores never fail an operation because persistence failed. [`Persisted`]
//! logs storage and serialization faults and lets the in-memory mutation
//! stand.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Storage keys, one per store slice.
pub mod keys {
    /// Signed-in account snapshot.
    pub const AUTH_USER: &str = "auth_user";

    /// Mock bearer token issued at login.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Cart line list.
    pub const CART_ITEMS: &str = "cart_items";

    /// Wishlist product snapshots.
    pub const WISHLIST: &str = "wishlist";

    /// Comparison product snapshots.
    pub const COMPARE_LIST: &str = "compare_list";

    /// Price alert list.
    pub const PRICE_ALERTS: &str = "price_alerts";

    /// Price history log.
    pub const PRICE_HISTORY: &str = "price_history";

    /// Recent search queries.
    pub const SEARCH_HISTORY: &str = "search_history";

    /// Recently viewed product ids.
    pub const RECENTLY_VIEWED: &str = "recently_viewed";

    /// Product reviews.
    pub const PRODUCT_REVIEWS: &str = "product_reviews";

    /// Every key the storefront writes.
    pub const ALL: [&str; 10] = [
        AUTH_USER,
        AUTH_TOKEN,
        CART_ITEMS,
        WISHLIST,
        COMPARE_LIST,
        PRICE_ALERTS,
        PRICE_HISTORY,
        SEARCH_HISTORY,
        RECENTLY_VIEWED,
        PRODUCT_REVIEWS,
    ];
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters that are not safe as a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Filesystem failure.
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// A flat string key/value store.
pub trait Storage: Send + Sync {
    /// Read a value, `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Storage handle shared by all stores.
pub type SharedStorage = Arc<dyn Storage>;

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage already wrapped for sharing.
    #[must_use]
    pub fn shared() -> SharedStorage {
        Arc::new(Self::new())
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no keys are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.clear();
        Ok(())
    }
}

/// Directory-backed storage, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// The storage directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        // Write-then-rename so a crash never leaves a half-written slice
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| StorageError::Io {
                key: key.to_owned(),
                source,
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        let entries = fs::read_dir(&self.root).map_err(|source| StorageError::Io {
            key: self.root.display().to_string(),
            source,
        })?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|source| StorageError::Io {
                    key: path.display().to_string(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

/// A typed view of one storage key.
///
/// Values are written as whole JSON snapshots on every save.
pub struct Persisted<T> {
    storage: SharedStorage,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Persisted<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Persisted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persisted").field("key", &self.key).finish()
    }
}

impl<T: Serialize + DeserializeOwned> Persisted<T> {
    /// Bind a key of the shared storage.
    #[must_use]
    pub fn new(storage: SharedStorage, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _marker: PhantomData,
        }
    }

    /// The bound key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Read the snapshot.
    ///
    /// Returns `None` when the key is absent, unreadable or holds JSON that no
    /// longer matches `T`; the latter two are logged.
    #[must_use]
    pub fn load(&self) -> Option<T> {
        let raw = match self.storage.get_item(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = self.key, "No persisted state");
                return None;
            }
            Err(e) => {
                warn!(key = self.key, error = %e, "Failed to read persisted state");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = self.key, error = %e, "Discarding corrupt persisted state");
                None
            }
        }
    }

    /// Write the snapshot.
    pub fn save(&self, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = self.key, error = %e, "Failed to serialize state");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(self.key, &json) {
            warn!(key = self.key, error = %e, "Failed to persist state");
        }
    }

    /// Delete the snapshot.
    pub fn remove(&self) {
        if let Err(e) = self.storage.remove_item(self.key) {
            warn!(key = self.key, error = %e, "Failed to remove persisted state");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_basic_ops() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cart_items").unwrap(), None);

        storage.set_item("cart_items", "[]").unwrap();
        assert_eq!(storage.get_item("cart_items").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("cart_items").unwrap();
        storage.remove_item("cart_items").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("state")).unwrap();

        storage.set_item("wishlist", "[1,2]").unwrap();
        storage.set_item("auth_token", "\"token_2\"").unwrap();
        assert_eq!(storage.get_item("wishlist").unwrap().as_deref(), Some("[1,2]"));

        storage.clear().unwrap();
        assert_eq!(storage.get_item("wishlist").unwrap(), None);
        assert_eq!(storage.get_item("auth_token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_persisted_roundtrip() {
        let storage = MemoryStorage::shared();
        let slot: Persisted<Vec<String>> = Persisted::new(storage, keys::SEARCH_HISTORY);
        assert!(slot.load().is_none());

        slot.save(&vec!["laptop".to_string()]);
        assert_eq!(slot.load().unwrap(), vec!["laptop".to_string()]);

        slot.remove();
        assert!(slot.load().is_none());
    }

    #[test]
    fn test_persisted_discards_corrupt_json() {
        let storage = MemoryStorage::shared();
        storage.set_item(keys::CART_ITEMS, "{not json").unwrap();
        let slot: Persisted<Vec<u32>> = Persisted::new(storage, keys::CART_ITEMS);
        assert!(slot.load().is_none());
    }
}
