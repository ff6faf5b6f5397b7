//! Which company's data a signed-in user is looking at.

use pos_auth::Session;
use pos_cache::{keys, Cache};
use pos_commerce::CompanyId;

use crate::CoreError;

/// The company a superadmin has picked, persisted across restarts.
///
/// Users who belong to a company always see their own company; the stored
/// preference only matters for users without one.
#[derive(Debug, Clone)]
pub struct CompanyScope {
    cache: Cache,
    key: String,
}

impl CompanyScope {
    pub fn new(cache: Cache) -> Self {
        Self::with_key(cache, keys::COMPANY_SCOPE)
    }

    pub fn with_key(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    /// The stored preference. It is written as the bare id; a JSON string
    /// is accepted too.
    pub fn selected(&self) -> Option<CompanyId> {
        let stored = match self.cache.get::<String>(&self.key) {
            Ok(value) => value,
            Err(_) => self.cache.get_string(&self.key).ok().flatten(),
        };
        stored
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != "null")
            .map(CompanyId::new)
    }

    pub fn select(&self, company: &CompanyId) -> Result<(), CoreError> {
        self.cache.set_string(&self.key, company.as_str())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CoreError> {
        self.cache.delete(&self.key)?;
        Ok(())
    }

    /// Company to scope queries to for `session`.
    ///
    /// `Ok(None)` means an ordinary user with no company, whose queries are
    /// scoped to their own records instead.
    pub fn resolve(&self, session: &Session) -> Result<Option<CompanyId>, CoreError> {
        if let Some(company) = session.company() {
            return Ok(Some(company.clone()));
        }
        match self.selected() {
            Some(company) => Ok(Some(company)),
            None if session.is_superadmin() => Err(CoreError::CompanyScopeRequired),
            None => Ok(None),
        }
    }
}
