//! Application shell for the POS.
//!
//! Ties the persisted client state (session, cart, drafts, company scope)
//! to the order service and the fragment router.
//!
//! # Example
//!
//! ```rust
//! use pos_core::prelude::*;
//! use pos_commerce::cart::ProductRef;
//!
//! let cart = CartStore::new(Cache::in_memory());
//! cart.add_item(&ProductRef::new("p1").with_price(100.0), 2.0)?;
//! cart.add_item(&ProductRef::new("p2").with_price(50.0), 1.0)?;
//!
//! assert_eq!(cart.total(), 250.0);
//! assert_eq!(cart.count(), 3.0);
//! # Ok::<(), pos_core::CoreError>(())
//! ```

pub mod app;
pub mod cart_store;
pub mod config;
pub mod drafts;
pub mod error;
pub mod events;
pub mod nav;
pub mod orders;
pub mod scope;
pub mod session_store;

pub use app::{App, Chrome, HeadlessApp};
pub use cart_store::CartStore;
pub use config::{AppConfig, OrdersConfig, RouterConfig, StorageKeys};
pub use drafts::DraftStore;
pub use error::CoreError;
pub use events::{CartChanged, SessionChanged};
pub use nav::NavState;
pub use orders::{MemoryOrderStore, OrderFilter, OrderService, OrderStore};
pub use scope::CompanyScope;
pub use session_store::SessionStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::app::{App, Chrome, HeadlessApp};
    pub use crate::cart_store::CartStore;
    pub use crate::config::AppConfig;
    pub use crate::drafts::DraftStore;
    pub use crate::error::CoreError;
    pub use crate::events::{CartChanged, SessionChanged};
    pub use crate::nav::{dashboard_path, is_active_link, keeps_cart_sidebar, NavState};
    pub use crate::orders::{MemoryOrderStore, OrderService, OrderStore};
    pub use crate::scope::CompanyScope;
    pub use crate::session_store::SessionStore;

    pub use pos_cache::Cache;
}
