//! The `users` collection.

use async_trait::async_trait;
use parking_lot::RwLock;
use pos_commerce::ids::UserId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::password::Credentials;
use crate::role::Role;
use crate::user::UserRecord;
use crate::AuthError;

/// Access to stored user documents.
///
/// Lookups by username and email compare exact strings; callers normalize
/// them first.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get(&self, id: &UserId) -> Result<Option<UserRecord>, AuthError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;

    /// Store a new user and return its assigned identifier.
    async fn insert(&self, user: UserRecord) -> Result<UserId, AuthError>;

    /// Replace the salt and hash and clear any plaintext password.
    async fn set_credentials(&self, id: &UserId, credentials: Credentials) -> Result<(), AuthError>;

    async fn set_role(&self, id: &UserId, role: Role) -> Result<(), AuthError>;
}

/// In-process directory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: RwLock<BTreeMap<UserId, UserRecord>>,
    read_only: AtomicBool,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write with a directory error while `read_only` is set.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Store a record as-is, keeping its identifier (or assigning one).
    pub fn seed(&self, mut user: UserRecord) -> UserId {
        if user.id.is_empty() {
            user.id = UserId::generate();
        }
        let id = user.id.clone();
        self.users.write().insert(id.clone(), user);
        id
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn check_writable(&self) -> Result<(), AuthError> {
        if self.read_only.load(Ordering::SeqCst) {
            Err(AuthError::Directory("directory is read-only".to_string()))
        } else {
            Ok(())
        }
    }

    fn find(&self, pred: impl Fn(&UserRecord) -> bool) -> Option<UserRecord> {
        self.users.read().values().find(|u| pred(u)).cloned()
    }

    fn update(&self, id: &UserId, f: impl FnOnce(&mut UserRecord)) -> Result<(), AuthError> {
        self.check_writable()?;
        let mut users = self.users.write();
        let user = users
            .get_mut(id)
            .ok_or_else(|| AuthError::UserNotFound(id.to_string()))?;
        f(user);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn get(&self, id: &UserId) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.find(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn insert(&self, mut user: UserRecord) -> Result<UserId, AuthError> {
        self.check_writable()?;
        user.id = UserId::generate();
        Ok(self.seed(user))
    }

    async fn set_credentials(&self, id: &UserId, credentials: Credentials) -> Result<(), AuthError> {
        self.update(id, |u| u.set_credentials(credentials))
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<(), AuthError> {
        self.update(id, |u| u.role = role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(username: &str) -> UserRecord {
        serde_json::from_value(json!({"username": username, "email": format!("{username}@x.io")}))
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let dir = MemoryDirectory::new();
        let id = dir.insert(record("ann")).await.unwrap();

        let stored = dir.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert!(id.as_str().starts_with("user_"));
    }

    #[tokio::test]
    async fn test_find_by_username_and_email() {
        let dir = MemoryDirectory::new();
        dir.seed(record("ann"));

        assert!(dir.find_by_username("ann").await.unwrap().is_some());
        assert!(dir.find_by_email("ann@x.io").await.unwrap().is_some());
        assert!(dir.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let dir = MemoryDirectory::new();
        let id = dir.seed(record("ann"));
        dir.set_read_only(true);

        assert!(dir.insert(record("bob")).await.is_err());
        assert!(dir.set_role(&id, Role::Staff).await.is_err());
        assert_eq!(dir.len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let dir = MemoryDirectory::new();
        assert!(matches!(
            dir.set_role(&UserId::new("nope"), Role::Staff).await,
            Err(AuthError::UserNotFound(_))
        ));
    }
}
