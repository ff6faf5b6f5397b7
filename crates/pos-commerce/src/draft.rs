//! Locally saved draft orders.

use serde::{Deserialize, Serialize};

use crate::cart::{external_items, Cart, LineItem};
use crate::coerce::finite_or_zero;
use crate::error::CommerceError;
use crate::ids::DraftId;
use crate::timestamp::Timestamp;

/// A named snapshot of a cart.
///
/// Stored as `{ "id", "items", "at" }` where `at` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftOrder {
    #[serde(default)]
    pub id: DraftId,
    #[serde(default, deserialize_with = "external_items")]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Timestamp>,
}

impl DraftOrder {
    /// Snapshot a cart under a fresh identifier.
    pub fn from_cart(cart: &Cart) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        Ok(Self {
            id: DraftId::generate(),
            items: cart.items().to_vec(),
            at: Some(Timestamp::now_millis()),
        })
    }

    /// Total quantity across the draft's items.
    pub fn item_count(&self) -> f64 {
        self.items.iter().map(|i| finite_or_zero(i.qty)).sum()
    }

    /// Rebuild the cart this draft holds.
    pub fn to_cart(&self) -> Cart {
        Cart::from_items(self.items.iter().cloned())
    }

    /// First twelve characters of the identifier, for list display.
    pub fn short_id(&self) -> &str {
        let id = self.id.as_str();
        match id.char_indices().nth(12) {
            Some((idx, _)) => &id[..idx],
            None => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ProductRef;
    use serde_json::json;

    #[test]
    fn test_from_cart_snapshots_items() {
        let mut cart = Cart::new();
        cart.add_item(&ProductRef::new("p1").with_price(10.0), 2.0)
            .unwrap();

        let draft = DraftOrder::from_cart(&cart).unwrap();
        assert!(draft.id.as_str().starts_with("draft_"));
        assert_eq!(draft.items, cart.items());
        assert_eq!(draft.item_count(), 2.0);
        assert!(draft.at.is_some());
    }

    #[test]
    fn test_from_empty_cart_fails() {
        assert!(matches!(
            DraftOrder::from_cart(&Cart::new()),
            Err(CommerceError::EmptyCart)
        ));
    }

    #[test]
    fn test_reads_loose_stored_shape() {
        let draft: DraftOrder = serde_json::from_value(json!({
            "id": 42,
            "items": [{"productId": "p9", "title": "Tea", "price": "3", "qty": "2"}],
            "at": 1700000000000u64
        }))
        .unwrap();

        assert_eq!(draft.id.as_str(), "42");
        assert_eq!(draft.items, vec![LineItem::new("p9", "Tea", 3.0, 2.0)]);
        assert_eq!(draft.at.map(|t| t.to_epoch_millis()), Some(1_700_000_000_000));
    }

    #[test]
    fn test_missing_items_reads_empty() {
        let draft: DraftOrder = serde_json::from_value(json!({"id": "d1", "items": null})).unwrap();
        assert!(draft.items.is_empty());
        assert!(draft.to_cart().is_empty());
    }

    #[test]
    fn test_short_id() {
        let draft: DraftOrder =
            serde_json::from_value(json!({"id": "draft_abcdefghijkl"})).unwrap();
        assert_eq!(draft.short_id(), "draft_abcdef");
    }
}
