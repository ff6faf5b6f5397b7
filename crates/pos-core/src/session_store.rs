//! The persisted signed-in session.

use parking_lot::RwLock;
use pos_auth::Session;
use pos_cache::{keys, Cache, PersistedSlot};
use pos_router::Signal;
use std::sync::Arc;

use crate::events::SessionChanged;
use crate::CoreError;

/// Holds the current session and mirrors it to storage.
///
/// Every save re-serializes the whole record. Listeners on
/// [`SessionStore::changed`] hear about each save and clear.
#[derive(Clone)]
pub struct SessionStore {
    slot: PersistedSlot<Session>,
    current: Arc<RwLock<Option<Session>>>,
    changed: Signal<SessionChanged>,
}

impl SessionStore {
    /// Open the store on the default key and load what is there.
    pub fn new(cache: Cache) -> Self {
        Self::with_key(cache, keys::SESSION)
    }

    pub fn with_key(cache: Cache, key: &str) -> Self {
        let slot = PersistedSlot::new(cache, key);
        let current = slot.load();
        tracing::debug!(key, signed_in = current.is_some(), "session loaded");
        Self {
            slot,
            current: Arc::new(RwLock::new(current)),
            changed: Signal::new(),
        }
    }

    /// Re-read storage. Absent, `null` and malformed records all read as
    /// signed out.
    pub fn reload(&self) -> Option<Session> {
        let session = self.slot.load();
        *self.current.write() = session.clone();
        session
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// The current session, or [`CoreError::NotSignedIn`].
    pub fn require(&self) -> Result<Session, CoreError> {
        self.current().ok_or(CoreError::NotSignedIn)
    }

    /// Persist `session` and notify listeners.
    pub fn save(&self, session: Session) -> Result<(), CoreError> {
        self.slot.save(Some(&session))?;
        *self.current.write() = Some(session.clone());
        self.changed.emit(&SessionChanged {
            session: Some(session),
        });
        Ok(())
    }

    /// Persist `null` and notify listeners.
    pub fn clear(&self) -> Result<(), CoreError> {
        self.slot.clear()?;
        *self.current.write() = None;
        self.changed.emit(&SessionChanged { session: None });
        Ok(())
    }

    pub fn changed(&self) -> &Signal<SessionChanged> {
        &self.changed
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.slot.key())
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pos_auth::Role;
    use pos_commerce::ids::{CompanyId, UserId};

    fn alice() -> Session {
        Session {
            uid: UserId::new("u1"),
            username: "alice".into(),
            email: "alice@example.com".into(),
            role: Role::Manager,
            first_name: "Alice".into(),
            last_name: "Reyes".into(),
            company_id: Some(CompanyId::new("c1")),
        }
    }

    #[test]
    fn test_absent_is_signed_out() {
        let store = SessionStore::new(Cache::in_memory());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_malformed_is_signed_out() {
        let cache = Cache::in_memory();
        cache.set(keys::SESSION, &serde_json::json!({"uid": 5})).unwrap();

        let store = SessionStore::new(cache);
        assert!(store.current().is_none());
    }

    #[test]
    fn test_save_persists_and_survives_reopen() {
        let cache = Cache::in_memory();
        SessionStore::new(cache.clone()).save(alice()).unwrap();

        let reopened = SessionStore::new(cache);
        assert_eq!(reopened.current(), Some(alice()));
    }

    #[test]
    fn test_clear_writes_null() {
        let cache = Cache::in_memory();
        let store = SessionStore::new(cache.clone());
        store.save(alice()).unwrap();
        store.clear().unwrap();

        assert_eq!(cache.get_string(keys::SESSION).unwrap().as_deref(), Some("null"));
        assert!(matches!(store.require(), Err(CoreError::NotSignedIn)));
    }

    #[test]
    fn test_changed_signal() {
        let store = SessionStore::new(Cache::in_memory());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        store
            .changed()
            .subscribe(move |e: &SessionChanged| s.lock().push(e.session.is_some()));

        store.save(alice()).unwrap();
        store.clear().unwrap();
        assert_eq!(*seen.lock(), vec![true, false]);
    }
}
