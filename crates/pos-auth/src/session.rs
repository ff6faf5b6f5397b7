//! The signed-in identity.

use pos_commerce::ids::{CompanyId, UserId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::role::Role;

/// Who is signed in.
///
/// Persisted as one JSON object with camelCase keys. A missing company is
/// written as `""`, and `""` reads back as no company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(
        default,
        serialize_with = "company_to_text",
        deserialize_with = "company_from_text"
    )]
    pub company_id: Option<CompanyId>,
}

impl Session {
    /// Avatar initials: first letter of each name, `?` when the first name
    /// is empty.
    pub fn initials(&self) -> String {
        let first = self.first_name.chars().next().unwrap_or('?');
        let mut initials = String::from(first);
        if let Some(last) = self.last_name.chars().next() {
            initials.push(last);
        }
        initials
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn company(&self) -> Option<&CompanyId> {
        self.company_id.as_ref()
    }

    /// Company id as stored on documents: `""` for none.
    pub fn company_text(&self) -> &str {
        self.company_id.as_ref().map(CompanyId::as_str).unwrap_or("")
    }

    pub fn is_superadmin(&self) -> bool {
        self.role.is_superadmin()
    }
}

fn company_to_text<S: Serializer>(company: &Option<CompanyId>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(company.as_ref().map(CompanyId::as_str).unwrap_or(""))
}

fn company_from_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<CompanyId>, D::Error> {
    let id = CompanyId::deserialize(d)?;
    Ok((!id.is_empty()).then_some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> Session {
        Session {
            uid: UserId::new("u1"),
            username: "alice".into(),
            email: "alice@example.com".into(),
            role: Role::Staff,
            first_name: "Alice".into(),
            last_name: "Reyes".into(),
            company_id: None,
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(session().initials(), "AR");

        let mut anon = session();
        anon.first_name.clear();
        anon.last_name.clear();
        assert_eq!(anon.initials(), "?");
    }

    #[test]
    fn test_empty_company_round_trip() {
        let value = serde_json::to_value(session()).unwrap();
        assert_eq!(value["companyId"], json!(""));
        assert_eq!(value["firstName"], json!("Alice"));

        let back: Session = serde_json::from_value(value).unwrap();
        assert_eq!(back.company_id, None);
        assert_eq!(back, session());
    }

    #[test]
    fn test_company_present() {
        let s: Session = serde_json::from_value(json!({
            "uid": "u2", "role": "admin-owner", "companyId": "c9"
        }))
        .unwrap();
        assert_eq!(s.company(), Some(&CompanyId::new("c9")));
        assert_eq!(s.company_text(), "c9");
    }

    #[test]
    fn test_missing_role_rejected() {
        assert!(serde_json::from_value::<Session>(json!({"uid": "u3"})).is_err());
    }
}
