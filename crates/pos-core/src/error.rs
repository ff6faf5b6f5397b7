//! Core error types.

use thiserror::Error;

/// Errors surfaced by the application shell.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage error.
    #[error("storage error: {0}")]
    Cache(#[from] pos_cache::CacheError),

    /// Cart, draft or order rule violated.
    #[error(transparent)]
    Commerce(#[from] pos_commerce::CommerceError),

    /// Account or permission error.
    #[error(transparent)]
    Auth(#[from] pos_auth::AuthError),

    /// Route registration error.
    #[error(transparent)]
    Router(#[from] pos_router::RouterError),

    /// Checkout or draft save with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A superadmin must pick a company before browsing open orders.
    #[error("Select a company to view its open orders")]
    CompanyScopeRequired,

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// Draft not found.
    #[error("draft not found: {0}")]
    DraftNotFound(String),

    /// Order not found.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// The order store rejected or failed a request.
    #[error("No permission or no data: {0}")]
    OrderStore(String),
}

impl CoreError {
    /// Check if the user can fix this by picking or signing in.
    pub fn needs_user_action(&self) -> bool {
        matches!(self, CoreError::CompanyScopeRequired | CoreError::NotSignedIn)
    }
}
