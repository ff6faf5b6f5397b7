//! A single typed value persisted under a fixed key.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::{Cache, CacheError};

/// A typed binding of one storage key.
///
/// The stored form is the JSON of `Option<T>`: an absent value is written
/// as `null`, so clearing a slot keeps the key present, the same way the
/// browser client persists a signed-out session.
///
/// # Example
///
/// ```rust
/// use pos_cache::{Cache, PersistedSlot};
///
/// let slot = PersistedSlot::<String>::new(Cache::in_memory(), "greeting");
/// assert_eq!(slot.load(), None);
/// slot.save(Some(&"hi".to_string())).unwrap();
/// assert_eq!(slot.load().as_deref(), Some("hi"));
/// ```
pub struct PersistedSlot<T> {
    cache: Cache,
    key: String,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for PersistedSlot<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            key: self.key.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> PersistedSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind `key` in `cache`.
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
            _phantom: PhantomData,
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the value.
    ///
    /// Missing keys, `null` and malformed data all read as `None`.
    pub fn load(&self) -> Option<T> {
        self.cache.get_or_default::<Option<T>>(&self.key)
    }

    /// Read the value, surfacing malformed data as an error.
    pub fn try_load(&self) -> Result<Option<T>, CacheError> {
        Ok(self.cache.get::<Option<T>>(&self.key)?.flatten())
    }

    /// Serialize the whole value (or `null`) under the key.
    pub fn save(&self, value: Option<&T>) -> Result<(), CacheError> {
        self.cache.set(&self.key, &value)
    }

    /// Persist `null`.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.save(None)
    }

    /// Remove the key entirely.
    pub fn remove(&self) -> Result<(), CacheError> {
        self.cache.delete(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
    }

    fn slot() -> PersistedSlot<Profile> {
        PersistedSlot::new(Cache::in_memory(), "profile")
    }

    #[test]
    fn test_load_missing_is_none() {
        assert_eq!(slot().load(), None);
    }

    #[test]
    fn test_save_and_load() {
        let slot = slot();
        let profile = Profile { name: "Ana".into() };
        slot.save(Some(&profile)).unwrap();
        assert_eq!(slot.load(), Some(profile));
    }

    #[test]
    fn test_clear_writes_null() {
        let slot = slot();
        slot.save(Some(&Profile { name: "Ana".into() })).unwrap();
        slot.clear().unwrap();

        assert_eq!(slot.load(), None);
        assert_eq!(
            slot.cache.get_string("profile").unwrap().as_deref(),
            Some("null")
        );
    }

    #[test]
    fn test_malformed_loads_as_none() {
        let cache = Cache::in_memory();
        cache.set("profile", &42).unwrap();
        let slot = PersistedSlot::<Profile>::new(cache, "profile");

        assert_eq!(slot.load(), None);
        assert!(slot.try_load().is_err());
    }
}
