//! Key-Value store wrapper with automatic serialization.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, FileBackend, KvBackend, MemoryBackend};

/// Type-safe cache over a [`KvBackend`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning is cheap and clones share
/// the same backend.
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn KvBackend>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an existing backend.
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Open a throwaway in-memory cache.
    ///
    /// # Example
    ///
    /// ```rust
    /// let cache = pos_cache::Cache::in_memory();
    /// cache.set("greeting", &"hello").unwrap();
    /// assert_eq!(cache.get::<String>("greeting").unwrap().as_deref(), Some("hello"));
    /// ```
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Open a cache persisted to a directory.
    pub fn open_dir(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(Arc::new(FileBackend::open(path)?)))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and an error if the stored
    /// bytes don't decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a value, falling back to `T::default()` when the key is missing,
    /// unreadable or malformed. Never fails.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get::<T>(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable stored value");
                T::default()
            }
        }
    }

    /// Set a value in the cache, replacing whatever was there.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        tracing::debug!(key, bytes = bytes.len(), "writing stored value");
        self.backend.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.backend.keys()
    }

    /// Get the raw string stored under `key`.
    pub fn get_string(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self
            .backend
            .get(key)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Store `value` as raw text, without JSON quoting.
    pub fn set_string(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.backend.set(key, value.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        qty: f64,
    }

    #[test]
    fn test_get_missing_is_none() {
        let cache = Cache::in_memory();
        assert_eq!(cache.get::<Item>("nope").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let cache = Cache::in_memory();
        let items = vec![Item { id: "p1".into(), qty: 2.0 }];
        cache.set("items", &items).unwrap();

        let back: Vec<Item> = cache.get("items").unwrap().unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn test_set_string_is_unquoted() {
        let cache = Cache::in_memory();
        cache.set_string("company", "c1").unwrap();
        assert_eq!(cache.get_string("company").unwrap().as_deref(), Some("c1"));
        assert!(cache.get::<String>("company").is_err());
    }

    #[test]
    fn test_get_malformed_is_error() {
        let cache = Cache::in_memory();
        cache.set("items", &"not a list").unwrap();
        assert!(cache.get::<Vec<Item>>("items").is_err());
    }

    #[test]
    fn test_get_or_default_on_malformed() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set("items", b"{broken").unwrap();
        let cache = Cache::new(backend);

        let items: Vec<Item> = cache.get_or_default("items");
        assert!(items.is_empty());
    }

    #[test]
    fn test_clones_share_backend() {
        let a = Cache::in_memory();
        let b = a.clone();
        a.set("k", &1).unwrap();
        assert_eq!(b.get::<i32>("k").unwrap(), Some(1));
    }

    #[test]
    fn test_delete_and_exists() {
        let cache = Cache::in_memory();
        cache.set("k", &true).unwrap();
        assert!(cache.exists("k").unwrap());
        cache.delete("k").unwrap();
        assert!(!cache.exists("k").unwrap());
    }
}
