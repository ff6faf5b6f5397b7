//! Authentication and authorization for the POS.
//!
//! Provides the role set, the role policy table, salted password digests,
//! the signed-in [`Session`] record and the account operations that work
//! against a [`UserDirectory`].

mod accounts;
mod directory;
mod error;
mod password;
mod policy;
mod role;
mod session;
mod user;

pub use accounts::Accounts;
pub use directory::{MemoryDirectory, UserDirectory};
pub use error::AuthError;
pub use password::{digest, Credentials, PasswordHasher};
pub use policy::{AuthorizationPolicy, RoleRules};
pub use role::Role;
pub use session::Session;
pub use user::{normalize_identity, NewUser, Registration, UserRecord};
