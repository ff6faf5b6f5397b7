//! Fragment router for the POS shell.
//!
//! Maps the location fragment (`#/company/abc?tab=orders`) to a registered
//! handler, renders the handler's output into a single [`Mount`] and fires
//! [`RouteChanged`] afterwards.
//!
//! # Example
//!
//! ```rust
//! use pos_router::{MemoryLocation, MemoryMount, RouteContext, Router};
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let location = Arc::new(MemoryLocation::new().starting_at("#/company/acme"));
//! let mount = Arc::new(MemoryMount::new());
//! let router = Router::new(location, mount.clone());
//!
//! router.add_route("/company/:id", |ctx: RouteContext| async move {
//!     Ok(Some(format!("Company {}", ctx.param("id").unwrap_or_default())))
//! })?;
//! router.on_route().await;
//!
//! assert_eq!(mount.content(), "Company acme");
//! # Ok::<(), pos_router::RouterError>(())
//! # }).unwrap();
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod location;
mod mount;
mod pattern;
mod query;
mod router;
mod signal;

pub use error::{HandlerError, HandlerResult, RouterError};
pub use location::{HashChange, Location, MemoryLocation};
pub use mount::{MemoryMount, Mount};
pub use pattern::{decode_component, Params, RoutePattern};
pub use query::{normalize_path, normalize_target, parse_fragment, parse_query, ParsedFragment, Query};
pub use router::{
    DispatchOutcome, HandlerStatus, Resolved, RouteChanged, RouteContext, Router, RouterOptions,
};
pub use signal::{Signal, Subscription};

pub use tokio_util::sync::CancellationToken;
