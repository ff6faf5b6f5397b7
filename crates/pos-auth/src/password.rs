//! Salted password digests.
//!
//! Stored as `salt` plus `passHash = hex(sha256("{salt}:{password}"))`.
//! This is a local check against a directory document, not an
//! authentication protocol.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A salt and the digest computed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub salt: String,
    pub pass_hash: String,
}

/// Password hasher configuration.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Salt length in characters.
    pub salt_length: usize,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { salt_length: 16 }
    }
}

impl PasswordHasher {
    /// Create a hasher producing salts of `salt_length` characters.
    pub fn new(salt_length: usize) -> Self {
        Self { salt_length }
    }

    /// Salt and hash a password.
    pub fn hash(&self, password: &str) -> Credentials {
        let salt = self.generate_salt();
        let pass_hash = digest(password, &salt);
        Credentials { salt, pass_hash }
    }

    /// Verify a password against stored credentials.
    pub fn verify(&self, password: &str, credentials: &Credentials) -> bool {
        constant_time_eq(
            digest(password, &credentials.salt).as_bytes(),
            credentials.pass_hash.to_ascii_lowercase().as_bytes(),
        )
    }

    /// Generate a random alphanumeric salt.
    pub fn generate_salt(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.salt_length)
            .map(char::from)
            .collect()
    }
}

/// `hex(sha256("{salt}:{password}"))`.
pub fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison to prevent timing attacks.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hasher = PasswordHasher::default();
        let creds = hasher.hash("hunter2");

        assert_eq!(creds.salt.len(), 16);
        assert!(creds.salt.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(creds.pass_hash.len(), 64);

        assert!(hasher.verify("hunter2", &creds));
        assert!(!hasher.verify("hunter3", &creds));
    }

    #[test]
    fn test_digest_format() {
        let expected = hex::encode(Sha256::digest(b"pepper:secret"));
        assert_eq!(digest("secret", "pepper"), expected);
    }

    #[test]
    fn test_different_salts_for_same_password() {
        let hasher = PasswordHasher::default();
        let a = hasher.hash("pw");
        let b = hasher.hash("pw");

        assert_ne!(a.salt, b.salt);
        assert!(hasher.verify("pw", &a));
        assert!(hasher.verify("pw", &b));
    }

    #[test]
    fn test_credentials_document_shape() {
        let json = serde_json::to_value(Credentials {
            salt: "s".into(),
            pass_hash: "h".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"salt": "s", "passHash": "h"}));
    }
}
