//! Account operations.
//!
//! Every check (duplicates, policy, company) runs before the directory is
//! written.

use pos_commerce::ids::UserId;
use pos_commerce::Timestamp;
use std::sync::Arc;

use crate::directory::UserDirectory;
use crate::password::{constant_time_eq, PasswordHasher};
use crate::policy::AuthorizationPolicy;
use crate::role::Role;
use crate::session::Session;
use crate::user::{normalize_identity, NewUser, Registration, UserRecord};
use crate::AuthError;

/// Registers, signs in and manages users against a [`UserDirectory`].
#[derive(Clone)]
pub struct Accounts {
    directory: Arc<dyn UserDirectory>,
    hasher: PasswordHasher,
    policy: AuthorizationPolicy,
}

impl Accounts {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            hasher: PasswordHasher::default(),
            policy: AuthorizationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AuthorizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }

    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// Public sign-up. The account is always a customer.
    pub async fn register(&self, registration: Registration) -> Result<Session, AuthError> {
        let username = normalize_identity(&registration.username);
        let email = normalize_identity(&registration.email);
        validate_required(&username, &email, &registration.password)?;
        self.ensure_unique(&username, &email).await?;

        let mut user = UserRecord {
            id: UserId::default(),
            username,
            email,
            role: Role::Customer,
            first_name: registration.first_name,
            last_name: registration.last_name,
            company_id: registration.company_id.unwrap_or_default(),
            branch_id: Default::default(),
            salt: None,
            pass_hash: None,
            password: None,
            created_at: Some(Timestamp::now()),
        };
        user.set_credentials(self.hasher.hash(&registration.password));

        user.id = self.directory.insert(user.clone()).await?;
        tracing::debug!(uid = %user.id, username = %user.username, "registered");
        Ok(user.to_session())
    }

    /// Sign in by username or email.
    ///
    /// Accounts that still carry a plaintext password are migrated to a
    /// salted digest when it matches. A failed migration write does not
    /// block the sign-in.
    pub async fn login(&self, identity: &str, password: &str) -> Result<Session, AuthError> {
        let identity = normalize_identity(identity);

        let found = match self.directory.find_by_username(&identity).await? {
            Some(user) => Some(user),
            None => self.directory.find_by_email(&identity).await?,
        };
        let mut user = found.ok_or(AuthError::InvalidCredentials)?;

        if user.credentials().is_none() {
            if let Some(plain) = user.password.as_deref() {
                if constant_time_eq(plain.as_bytes(), password.as_bytes()) {
                    let credentials = self.hasher.hash(password);
                    if let Err(e) = self
                        .directory
                        .set_credentials(&user.id, credentials.clone())
                        .await
                    {
                        tracing::warn!(uid = %user.id, error = %e, "credential migration failed");
                    }
                    user.set_credentials(credentials);
                }
            }
        }

        let credentials = user.credentials().ok_or(AuthError::InvalidCredentials)?;
        if !self.hasher.verify(password, &credentials) {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::debug!(uid = %user.id, "signed in");
        Ok(user.to_session())
    }

    /// Create a user on behalf of `actor`.
    pub async fn create_user(&self, actor: &Session, new_user: NewUser) -> Result<UserId, AuthError> {
        self.policy.ensure_can_create(actor.role, new_user.role)?;

        let username = normalize_identity(&new_user.username);
        let email = normalize_identity(&new_user.email);
        validate_required(&username, &email, &new_user.password)?;
        self.ensure_unique(&username, &email).await?;

        let mut user = UserRecord {
            id: UserId::default(),
            username,
            email,
            role: new_user.role,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            company_id: new_user
                .company_id
                .filter(|c| !c.is_empty())
                .or_else(|| actor.company_id.clone())
                .unwrap_or_default(),
            branch_id: new_user.branch_id.unwrap_or_default(),
            salt: None,
            pass_hash: None,
            password: None,
            created_at: Some(Timestamp::now()),
        };
        user.set_credentials(self.hasher.hash(&new_user.password));

        let id = self.directory.insert(user).await?;
        tracing::debug!(uid = %id, by = %actor.uid, role = %new_user.role, "user created");
        Ok(id)
    }

    /// Change another user's role.
    ///
    /// Only roles in the actor's editable set may be assigned, and only a
    /// superadmin may reach users outside their own company.
    pub async fn change_role(&self, actor: &Session, target: &UserId, role: Role) -> Result<(), AuthError> {
        self.policy.ensure_can_edit(actor.role, role)?;

        let user = self
            .directory
            .get(target)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(target.to_string()))?;

        if !actor.is_superadmin() && user.company_id.as_str() != actor.company_text() {
            return Err(AuthError::OtherCompany);
        }

        self.directory.set_role(target, role).await?;
        tracing::debug!(uid = %target, by = %actor.uid, role = %role, "role changed");
        Ok(())
    }

    async fn ensure_unique(&self, username: &str, email: &str) -> Result<(), AuthError> {
        if self.directory.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.directory.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }
        Ok(())
    }
}

fn validate_required(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::Validation("username is required".to_string()));
    }
    if email.is_empty() {
        return Err(AuthError::Validation("email is required".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("password is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use pos_commerce::ids::CompanyId;
    use serde_json::json;

    fn setup() -> (Arc<MemoryDirectory>, Accounts) {
        let dir = Arc::new(MemoryDirectory::new());
        let accounts = Accounts::new(dir.clone());
        (dir, accounts)
    }

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: username.into(),
            email: email.into(),
            password: "pw".into(),
            first_name: "Alice".into(),
            last_name: "Reyes".into(),
            company_id: None,
        }
    }

    fn actor(role: Role, company: Option<&str>) -> Session {
        Session {
            uid: UserId::new("actor"),
            username: "boss".into(),
            email: "boss@x.io".into(),
            role,
            first_name: "B".into(),
            last_name: "O".into(),
            company_id: company.map(CompanyId::new),
        }
    }

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.into(),
            email: format!("{username}@x.io"),
            password: "pw".into(),
            role,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_register_creates_customer() {
        let (_, accounts) = setup();
        let session = accounts
            .register(registration(" Alice ", "Alice@Example.com"))
            .await
            .unwrap();

        assert_eq!(session.username, "alice");
        assert_eq!(session.email, "alice@example.com");
        assert_eq!(session.role, Role::Customer);
        assert!(!session.uid.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_username_rejected_before_write() {
        let (dir, accounts) = setup();
        accounts.register(registration("alice", "a@x.io")).await.unwrap();

        let err = accounts
            .register(registration("alice", "other@x.io"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username already taken");
        assert_eq!(dir.len(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (_, accounts) = setup();
        accounts.register(registration("alice", "a@x.io")).await.unwrap();

        let err = accounts
            .register(registration("bob", "A@x.io"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn test_login_by_username_or_email() {
        let (_, accounts) = setup();
        accounts.register(registration("alice", "a@x.io")).await.unwrap();

        assert!(accounts.login("ALICE", "pw").await.is_ok());
        assert!(accounts.login("a@x.io", "pw").await.is_ok());

        let err = accounts.login("alice", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(accounts.login("ghost", "pw").await.unwrap_err().is_auth_failure());
    }

    #[tokio::test]
    async fn test_login_migrates_plaintext() {
        let (dir, accounts) = setup();
        let id = dir.seed(
            serde_json::from_value(json!({"username": "old", "role": "staff", "password": "pw"}))
                .unwrap(),
        );

        let session = accounts.login("old", "pw").await.unwrap();
        assert_eq!(session.role, Role::Staff);

        let stored = dir.get(&id).await.unwrap().unwrap();
        assert!(stored.password.is_none());
        assert!(stored.credentials().is_some());
    }

    #[tokio::test]
    async fn test_login_migration_write_failure_ignored() {
        let (dir, accounts) = setup();
        let id = dir.seed(
            serde_json::from_value(json!({"username": "old", "password": "pw"})).unwrap(),
        );
        dir.set_read_only(true);

        assert!(accounts.login("old", "pw").await.is_ok());
        assert!(dir.get(&id).await.unwrap().unwrap().password.is_some());
    }

    #[tokio::test]
    async fn test_login_plaintext_mismatch() {
        let (dir, accounts) = setup();
        dir.seed(serde_json::from_value(json!({"username": "old", "password": "pw"})).unwrap());

        assert!(matches!(
            accounts.login("old", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_create_user_policy_checked_before_write() {
        let (dir, accounts) = setup();
        let owner = actor(Role::Owner, Some("c1"));

        let err = accounts
            .create_user(&owner, new_user("peer", Role::Owner))
            .await
            .unwrap_err();
        assert!(err.is_permission_error());
        assert!(dir.is_empty());
    }

    #[tokio::test]
    async fn test_create_user_inherits_company() {
        let (dir, accounts) = setup();
        let manager = actor(Role::Manager, Some("c1"));

        let id = accounts
            .create_user(&manager, new_user("clerk", Role::Staff))
            .await
            .unwrap();
        let stored = dir.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.company_id.as_str(), "c1");
        assert_eq!(stored.role, Role::Staff);
    }

    #[tokio::test]
    async fn test_change_role_same_company_only() {
        let (dir, accounts) = setup();
        let president = actor(Role::President, Some("c1"));
        let other = dir.seed(
            serde_json::from_value(json!({"id": "u9", "username": "x", "companyId": "c2"}))
                .unwrap(),
        );

        assert!(matches!(
            accounts.change_role(&president, &other, Role::Staff).await,
            Err(AuthError::OtherCompany)
        ));

        let superadmin = actor(Role::SuperAdmin, None);
        accounts
            .change_role(&superadmin, &other, Role::Manager)
            .await
            .unwrap();
        assert_eq!(dir.get(&other).await.unwrap().unwrap().role, Role::Manager);
    }

    #[tokio::test]
    async fn test_change_role_outside_editable_set() {
        let (dir, accounts) = setup();
        let target = dir.seed(
            serde_json::from_value(json!({"username": "x", "companyId": "c1"})).unwrap(),
        );

        let manager = actor(Role::Manager, Some("c1"));
        assert!(matches!(
            accounts.change_role(&manager, &target, Role::Staff).await,
            Err(AuthError::AssignNotAllowed(Role::Staff))
        ));

        let president = actor(Role::President, Some("c1"));
        assert!(accounts
            .change_role(&president, &target, Role::President)
            .await
            .is_err());
        assert!(accounts
            .change_role(&president, &target, Role::Manager)
            .await
            .is_ok());
    }
}
