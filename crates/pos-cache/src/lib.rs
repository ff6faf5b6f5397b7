//! Durable key-value storage for the point-of-sale client.
//!
//! Provides a simple, ergonomic API for keeping client state (the signed-in
//! session, the cart, saved drafts) in a local key-value store with
//! automatic JSON serialization.
//!
//! # Example
//!
//! ```rust
//! use pos_cache::{keys, Cache};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Line {
//!     id: String,
//!     qty: f64,
//! }
//!
//! let cache = Cache::in_memory();
//!
//! // Store a value
//! cache.set(keys::CART, &vec![Line { id: "p1".into(), qty: 1.0 }]).unwrap();
//!
//! // Retrieve a value
//! let cart: Option<Vec<Line>> = cache.get(keys::CART).unwrap();
//! assert_eq!(cart.map(|c| c.len()), Some(1));
//!
//! // Delete a value
//! cache.delete(keys::CART).unwrap();
//! ```

mod backend;
mod error;
mod kv;
mod slot;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::CacheError;
pub use kv::Cache;
pub use slot::PersistedSlot;

/// Well-known storage keys.
pub mod keys {
    /// Signed-in session record, or `null`.
    pub const SESSION: &str = "cp.session.v1";
    /// Cart line items.
    pub const CART: &str = "cp.cart.v1";
    /// Saved draft orders.
    pub const DRAFTS: &str = "cp.openOrdersDrafts.v1";
    /// Company a superadmin last picked for order browsing.
    pub const COMPANY_SCOPE: &str = "cp.sales.companyId.v1";
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{keys, Cache, CacheError, KvBackend, PersistedSlot};
}
