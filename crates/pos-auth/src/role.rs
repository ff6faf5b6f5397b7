//! User roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AuthError;

/// User role for authorization.
///
/// Stored under the same names the documents use: `superadmin`,
/// `admin-owner`, `admin-president`, `admin-manager`, `admin-supervisor`,
/// `staff` and `customer`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Role {
    /// Platform operator, not tied to a company.
    #[serde(rename = "superadmin")]
    SuperAdmin,
    #[serde(rename = "admin-owner")]
    Owner,
    #[serde(rename = "admin-president")]
    President,
    #[serde(rename = "admin-manager")]
    Manager,
    #[serde(rename = "admin-supervisor")]
    Supervisor,
    #[serde(rename = "staff")]
    Staff,
    /// Self-registered shopper.
    #[default]
    #[serde(rename = "customer")]
    Customer,
}

impl Role {
    /// Every role, most privileged first.
    pub const ALL: [Role; 7] = [
        Role::SuperAdmin,
        Role::Owner,
        Role::President,
        Role::Manager,
        Role::Supervisor,
        Role::Staff,
        Role::Customer,
    ];

    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::Owner => "admin-owner",
            Role::President => "admin-president",
            Role::Manager => "admin-manager",
            Role::Supervisor => "admin-supervisor",
            Role::Staff => "staff",
            Role::Customer => "customer",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Owner => "Owner",
            Role::President => "President",
            Role::Manager => "Manager",
            Role::Supervisor => "Supervisor",
            Role::Staff => "Staff",
            Role::Customer => "Customer",
        }
    }

    /// Any role that sees the admin navigation.
    pub fn is_admin(&self) -> bool {
        !matches!(self, Role::Customer)
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AuthError::UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_unknown_role() {
        assert!(matches!("admin".parse::<Role>(), Err(AuthError::UnknownRole(_))));
        assert!(serde_json::from_str::<Role>(r#""root""#).is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(Role::Staff.is_admin());
        assert!(!Role::Customer.is_admin());
    }
}
