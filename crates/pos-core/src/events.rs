//! Events the stores broadcast.

use pos_auth::Session;

/// The cart was written. Listeners re-read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartChanged;

/// The session was saved or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChanged {
    pub session: Option<Session>,
}
