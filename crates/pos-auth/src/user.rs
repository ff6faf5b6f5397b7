//! User documents and the inputs that create them.

use pos_commerce::ids::{BranchId, CompanyId, UserId};
use pos_commerce::Timestamp;
use serde::{Deserialize, Serialize};

use crate::password::Credentials;
use crate::role::Role;
use crate::session::Session;

/// A document in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Document identifier, assigned by the directory.
    #[serde(default, skip_serializing_if = "UserId::is_empty")]
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// `""` when the user belongs to no company.
    #[serde(default)]
    pub company_id: CompanyId,
    #[serde(default, skip_serializing_if = "BranchId::is_empty")]
    pub branch_id: BranchId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_hash: Option<String>,
    /// Plaintext password left by old account imports. Cleared when the
    /// account is migrated on its next login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl UserRecord {
    /// Salted credentials, if both halves are present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.salt, &self.pass_hash) {
            (Some(salt), Some(hash)) if !salt.is_empty() && !hash.is_empty() => Some(Credentials {
                salt: salt.clone(),
                pass_hash: hash.clone(),
            }),
            _ => None,
        }
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.salt = Some(credentials.salt);
        self.pass_hash = Some(credentials.pass_hash);
        self.password = None;
    }

    pub fn company(&self) -> Option<&CompanyId> {
        (!self.company_id.is_empty()).then_some(&self.company_id)
    }

    /// The session this user signs in as.
    pub fn to_session(&self) -> Session {
        Session {
            uid: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company_id: self.company().cloned(),
        }
    }
}

/// Public sign-up form. Always creates a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

/// User created by an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    /// Defaults to the creating user's company.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
}

/// Trim and lower-case a username or email.
pub fn normalize_identity(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credentials_require_both_halves() {
        let mut user: UserRecord =
            serde_json::from_value(json!({"username": "bob", "salt": "abc"})).unwrap();
        assert!(user.credentials().is_none());

        user.pass_hash = Some(String::new());
        assert!(user.credentials().is_none());

        user.pass_hash = Some("ff".into());
        assert_eq!(user.credentials().map(|c| c.pass_hash), Some("ff".to_string()));
    }

    #[test]
    fn test_set_credentials_clears_plaintext() {
        let mut user: UserRecord =
            serde_json::from_value(json!({"username": "bob", "password": "pw"})).unwrap();
        user.set_credentials(Credentials {
            salt: "s".into(),
            pass_hash: "h".into(),
        });
        assert!(user.password.is_none());
        assert!(user.credentials().is_some());
    }

    #[test]
    fn test_to_session_maps_empty_company() {
        let user: UserRecord = serde_json::from_value(json!({
            "id": "u1", "username": "bob", "role": "staff", "companyId": ""
        }))
        .unwrap();
        let session = user.to_session();
        assert_eq!(session.uid.as_str(), "u1");
        assert_eq!(session.role, Role::Staff);
        assert!(session.company_id.is_none());
    }

    #[test]
    fn test_normalize_identity() {
        assert_eq!(normalize_identity("  Alice@Example.COM "), "alice@example.com");
    }
}
