//! Authentication errors.

use thiserror::Error;

use crate::role::Role;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown identity, wrong password, or an account without credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration or user creation with a username already in use.
    #[error("Username already taken")]
    UsernameTaken,

    /// Registration or user creation with an email already in use.
    #[error("Email already registered")]
    EmailTaken,

    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// The acting role may not create users with this role.
    #[error("You do not have permission to create users with role: {0}")]
    CreateNotAllowed(Role),

    /// The acting role may not assign this role.
    #[error("Not allowed to set role: {0}")]
    AssignNotAllowed(Role),

    /// Role changes outside the actor's own company.
    #[error("You can only change roles within your company.")]
    OtherCompany,

    /// A role name that is not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Input rejected before any write.
    #[error("validation error: {0}")]
    Validation(String),

    /// The user directory failed.
    #[error("directory error: {0}")]
    Directory(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials)
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            AuthError::CreateNotAllowed(_) | AuthError::AssignNotAllowed(_) | AuthError::OtherCompany
        )
    }
}
