//! The persisted cart.

use parking_lot::Mutex;
use pos_cache::{keys, Cache};
use pos_commerce::cart::{Cart, ProductRef};
use pos_commerce::ProductId;
use pos_router::Signal;
use serde_json::Value;
use std::sync::Arc;

use crate::events::CartChanged;
use crate::CoreError;

/// Cart state kept in storage under a single key.
///
/// Nothing is cached in memory: every read goes to storage, and every
/// mutation is a read-modify-write of the whole item list followed by a
/// [`CartChanged`] broadcast.
#[derive(Clone)]
pub struct CartStore {
    cache: Cache,
    key: String,
    changed: Signal<CartChanged>,
    write_lock: Arc<Mutex<()>>,
}

impl CartStore {
    pub fn new(cache: Cache) -> Self {
        Self::with_key(cache, keys::CART)
    }

    pub fn with_key(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
            changed: Signal::new(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current cart. Missing or unreadable data reads as an empty cart.
    pub fn read(&self) -> Cart {
        match self.cache.get::<Vec<Value>>(&self.key) {
            Ok(Some(values)) => Cart::from_external(&values),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "unreadable cart, treating as empty");
                Cart::new()
            }
        }
    }

    /// Replace the stored cart and notify listeners.
    pub fn write(&self, cart: &Cart) -> Result<(), CoreError> {
        let guard = self.write_lock.lock();
        self.cache.set(&self.key, cart)?;
        drop(guard);
        self.changed.emit(&CartChanged);
        Ok(())
    }

    /// Read-modify-write under the store's lock. Nothing is written when
    /// `f` fails.
    fn update<R>(
        &self,
        f: impl FnOnce(&mut Cart) -> Result<R, CoreError>,
    ) -> Result<(R, Cart), CoreError> {
        let guard = self.write_lock.lock();
        let mut cart = self.read();
        let result = f(&mut cart)?;
        self.cache.set(&self.key, &cart)?;
        drop(guard);
        self.changed.emit(&CartChanged);
        Ok((result, cart))
    }

    /// Add `qty` units of `product`. A reference with an empty identifier
    /// leaves storage untouched and returns `false`.
    pub fn add_item(&self, product: &ProductRef, qty: f64) -> Result<bool, CoreError> {
        if product.id.is_empty() {
            return Ok(false);
        }
        let (added, cart) = self.update(|cart| Ok(cart.add_item(product, qty)?))?;
        tracing::debug!(product = %product.id, qty, count = cart.count(), "cart add");
        Ok(added)
    }

    /// Set a quantity; zero or less removes the item. The cart is written
    /// back even when `id` is absent.
    pub fn set_quantity(&self, id: &ProductId, qty: f64) -> Result<bool, CoreError> {
        let (found, _) = self.update(|cart| Ok(cart.set_quantity(id, qty)))?;
        Ok(found)
    }

    pub fn remove_item(&self, id: &ProductId) -> Result<bool, CoreError> {
        self.set_quantity(id, 0.0)
    }

    /// Write an empty cart.
    pub fn clear(&self) -> Result<(), CoreError> {
        self.update(|cart| {
            cart.clear();
            Ok(())
        })?;
        Ok(())
    }

    /// Replace the cart with items of unknown shape. Returns the cart that
    /// was discarded.
    pub fn replace_from_items(&self, items: &[Value]) -> Result<Cart, CoreError> {
        self.replace_with(Cart::from_external(items))
    }

    /// Replace the cart wholesale. Returns the cart that was discarded.
    pub fn replace_with(&self, cart: Cart) -> Result<Cart, CoreError> {
        let (previous, _) = self.update(|current| Ok(std::mem::replace(current, cart)))?;
        if !previous.is_empty() {
            tracing::info!(discarded = previous.len(), "cart replaced");
        }
        Ok(previous)
    }

    /// Sum of item quantities.
    pub fn count(&self) -> f64 {
        self.read().count()
    }

    pub fn total(&self) -> f64 {
        self.read().total()
    }

    pub fn changed(&self) -> &Signal<CartChanged> {
        &self.changed
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").field("key", &self.key).finish()
    }
}
