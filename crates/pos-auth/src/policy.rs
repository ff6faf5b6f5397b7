//! The role policy table.
//!
//! One table answers both "which roles may this actor create?" and
//! "which roles may this actor assign to an existing user?". Both the user
//! creation form and the inline role editor consult it.

use std::collections::BTreeMap;

use crate::role::Role;
use crate::AuthError;

/// What one acting role may do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRules {
    /// Roles this actor may give to new users, in display order.
    pub creatable: Vec<Role>,
    /// Roles this actor may assign to existing users. Empty means the
    /// actor cannot edit roles at all.
    pub editable: Vec<Role>,
}

/// Role → rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    rules: BTreeMap<Role, RoleRules>,
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        use Role::*;

        let below_superadmin = vec![Customer, Staff, Supervisor, Manager, President, Owner];
        let below_owner = vec![Customer, Staff, Supervisor, Manager, President];
        let below_president = vec![Customer, Staff, Supervisor, Manager];

        let mut rules = BTreeMap::new();
        rules.insert(
            SuperAdmin,
            RoleRules {
                creatable: below_superadmin.clone(),
                editable: below_superadmin,
            },
        );
        rules.insert(
            Owner,
            RoleRules {
                creatable: below_owner.clone(),
                editable: below_owner,
            },
        );
        rules.insert(
            President,
            RoleRules {
                creatable: below_president.clone(),
                editable: below_president,
            },
        );
        rules.insert(
            Manager,
            RoleRules {
                creatable: vec![Customer, Staff, Supervisor],
                editable: Vec::new(),
            },
        );
        rules.insert(
            Supervisor,
            RoleRules {
                creatable: vec![Customer, Staff],
                editable: Vec::new(),
            },
        );
        rules.insert(
            Staff,
            RoleRules {
                creatable: vec![Customer],
                editable: Vec::new(),
            },
        );
        rules.insert(
            Customer,
            RoleRules {
                creatable: vec![Customer],
                editable: Vec::new(),
            },
        );

        Self { rules }
    }
}

impl AuthorizationPolicy {
    /// Policy with no rules; every check fails until rules are added.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Replace the rules for one acting role.
    pub fn with_rules(mut self, actor: Role, rules: RoleRules) -> Self {
        self.rules.insert(actor, rules);
        self
    }

    pub fn rules(&self, actor: Role) -> Option<&RoleRules> {
        self.rules.get(&actor)
    }

    /// Roles `actor` may create.
    pub fn creatable(&self, actor: Role) -> &[Role] {
        self.rules(actor).map(|r| r.creatable.as_slice()).unwrap_or(&[])
    }

    /// Roles `actor` may assign to existing users.
    pub fn editable(&self, actor: Role) -> &[Role] {
        self.rules(actor).map(|r| r.editable.as_slice()).unwrap_or(&[])
    }

    pub fn can_create(&self, actor: Role, role: Role) -> bool {
        self.creatable(actor).contains(&role)
    }

    pub fn can_edit(&self, actor: Role, role: Role) -> bool {
        self.editable(actor).contains(&role)
    }

    /// Whether `actor` gets a role editor at all.
    pub fn can_edit_roles(&self, actor: Role) -> bool {
        !self.editable(actor).is_empty()
    }

    pub fn ensure_can_create(&self, actor: Role, role: Role) -> Result<(), AuthError> {
        if self.can_create(actor, role) {
            Ok(())
        } else {
            Err(AuthError::CreateNotAllowed(role))
        }
    }

    pub fn ensure_can_edit(&self, actor: Role, role: Role) -> Result<(), AuthError> {
        if self.can_edit(actor, role) {
            Ok(())
        } else {
            Err(AuthError::AssignNotAllowed(role))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Role::*;

    #[test]
    fn test_creatable_table() {
        let policy = AuthorizationPolicy::default();

        assert_eq!(
            policy.creatable(SuperAdmin),
            &[Customer, Staff, Supervisor, Manager, President, Owner]
        );
        assert_eq!(
            policy.creatable(Owner),
            &[Customer, Staff, Supervisor, Manager, President]
        );
        assert_eq!(policy.creatable(President), &[Customer, Staff, Supervisor, Manager]);
        assert_eq!(policy.creatable(Manager), &[Customer, Staff, Supervisor]);
        assert_eq!(policy.creatable(Supervisor), &[Customer, Staff]);
        assert_eq!(policy.creatable(Staff), &[Customer]);
        assert_eq!(policy.creatable(Customer), &[Customer]);
    }

    #[test]
    fn test_nobody_creates_superadmin() {
        let policy = AuthorizationPolicy::default();
        for actor in Role::ALL {
            assert!(!policy.can_create(actor, SuperAdmin));
        }
    }

    #[test]
    fn test_owner_cannot_create_owner() {
        let policy = AuthorizationPolicy::default();
        assert!(matches!(
            policy.ensure_can_create(Owner, Owner),
            Err(AuthError::CreateNotAllowed(Owner))
        ));
    }

    #[test]
    fn test_editable_only_top_three() {
        let policy = AuthorizationPolicy::default();
        for actor in Role::ALL {
            let expected = matches!(actor, SuperAdmin | Owner | President);
            assert_eq!(policy.can_edit_roles(actor), expected, "{actor}");
            if expected {
                assert_eq!(policy.editable(actor), policy.creatable(actor));
            }
        }
        assert!(policy.ensure_can_edit(Manager, Staff).is_err());
    }

    #[test]
    fn test_custom_rules() {
        let policy = AuthorizationPolicy::empty().with_rules(
            Staff,
            RoleRules {
                creatable: vec![Customer, Staff],
                editable: vec![],
            },
        );
        assert!(policy.can_create(Staff, Staff));
        assert!(!policy.can_create(Owner, Customer));
    }
}
