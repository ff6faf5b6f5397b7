//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in point-of-sale operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(f64),

    /// Cart has no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Draft not found.
    #[error("Draft not found: {0}")]
    DraftNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(#[from] pos_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
