//! Named snapshots of the cart, kept as a list under one storage key.

use pos_cache::{keys, Cache};
use pos_commerce::cart::LineItem;
use pos_commerce::coerce::to_id_string;
use pos_commerce::draft::DraftOrder;
use pos_commerce::DraftId;
use serde_json::Value;

use crate::cart_store::CartStore;
use crate::CoreError;

/// Draft orders saved from, and loaded back into, a [`CartStore`].
#[derive(Debug, Clone)]
pub struct DraftStore {
    cache: Cache,
    key: String,
    cart: CartStore,
}

impl DraftStore {
    pub fn new(cache: Cache, cart: CartStore) -> Self {
        Self::with_key(cache, keys::DRAFTS, cart)
    }

    pub fn with_key(cache: Cache, key: impl Into<String>, cart: CartStore) -> Self {
        Self {
            cache,
            key: key.into(),
            cart,
        }
    }

    /// Stored entries as-is, including ones other clients wrote that this
    /// store cannot read.
    fn entries(&self) -> Vec<Value> {
        match self.cache.get::<Vec<Value>>(&self.key) {
            Ok(values) => values.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "unreadable draft list");
                Vec::new()
            }
        }
    }

    /// Saved drafts in save order. Entries that cannot be read are skipped.
    pub fn list(&self) -> Vec<DraftOrder> {
        self.entries()
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<DraftOrder>(v) {
                Ok(draft) if !draft.id.is_empty() => Some(draft),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed draft");
                    None
                }
            })
            .collect()
    }

    pub fn get(&self, id: &DraftId) -> Option<DraftOrder> {
        self.list().into_iter().find(|d| &d.id == id)
    }

    /// Snapshot the current cart and append it to the list.
    pub fn save_from_cart(&self) -> Result<DraftOrder, CoreError> {
        let cart = self.cart.read();
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let draft = DraftOrder::from_cart(&cart)?;

        let mut entries = self.entries();
        entries.push(serde_json::to_value(&draft).map_err(pos_cache::CacheError::from)?);
        self.cache.set(&self.key, &entries)?;

        tracing::debug!(draft = %draft.id, items = draft.items.len(), "draft saved");
        Ok(draft)
    }

    pub fn delete(&self, id: &DraftId) -> Result<(), CoreError> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|entry| {
            entry
                .get("id")
                .map_or(true, |entry_id| to_id_string(entry_id) != id.as_str())
        });
        if entries.len() == before {
            return Err(CoreError::DraftNotFound(id.to_string()));
        }
        self.cache.set(&self.key, &entries)?;
        Ok(())
    }

    /// Replace the live cart with the draft's items. The draft itself is
    /// kept. Returns the items that were in the cart before.
    pub fn load_into_cart(&self, id: &DraftId) -> Result<Vec<LineItem>, CoreError> {
        let draft = self
            .get(id)
            .ok_or_else(|| CoreError::DraftNotFound(id.to_string()))?;
        let previous = self.cart.replace_with(draft.to_cart())?;
        Ok(previous.into_items())
    }
}
