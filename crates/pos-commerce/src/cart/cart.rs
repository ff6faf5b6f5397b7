//! Cart arithmetic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cart::{LineItem, ProductRef};
use crate::coerce::finite_or_zero;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// An ordered list of line items with at most one entry per product.
///
/// Serializes as the bare item array, which is the stored cart format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from canonical line items, merging duplicates and
    /// dropping entries without an identifier or with no quantity.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.id.is_empty() {
                continue;
            }
            match cart.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => existing.qty += item.qty,
                None => cart.items.push(item),
            }
        }
        cart.drop_empty();
        cart
    }

    /// Build a cart from items of unknown shape (an old order's items, a
    /// draft written by another client, ...).
    pub fn from_external(values: &[Value]) -> Self {
        Self::from_items(values.iter().map(LineItem::from_external))
    }

    /// Add a product.
    ///
    /// A reference with an empty identifier is ignored and `Ok(false)` is
    /// returned. When the product is already present its quantity grows
    /// by `qty`; otherwise a new entry is appended. A zero or non-finite
    /// `qty` counts as one unit.
    pub fn add_item(&mut self, product: &ProductRef, qty: f64) -> Result<bool, CommerceError> {
        if product.id.is_empty() {
            return Ok(false);
        }

        let qty = if qty.is_finite() && qty != 0.0 { qty } else { 1.0 };
        if qty < 0.0 {
            return Err(CommerceError::InvalidQuantity(qty));
        }

        // Check if item already exists
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == product.id) {
            existing.qty = finite_or_zero(existing.qty) + qty;
            return Ok(true);
        }

        self.items.push(product.to_line_item(qty));
        Ok(true)
    }

    /// Set an item's quantity.
    ///
    /// The quantity is clamped to zero or more. Afterwards every entry
    /// with no positive quantity is removed, whether or not `id` was
    /// found. Returns whether `id` was present.
    pub fn set_quantity(&mut self, id: &ProductId, qty: f64) -> bool {
        let found = match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.qty = finite_or_zero(qty).max(0.0);
                true
            }
            None => false,
        };
        self.drop_empty();
        found
    }

    /// Remove an item.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        self.set_quantity(id, 0.0)
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price × qty`.
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|i| finite_or_zero(i.price) * finite_or_zero(i.qty))
            .sum()
    }

    /// Sum of quantities.
    pub fn count(&self) -> f64 {
        self.items.iter().map(|i| finite_or_zero(i.qty)).sum()
    }

    /// Get number of unique items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by product ID.
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// The items, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume and return the items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    fn drop_empty(&mut self) {
        self.items.retain(|i| i.qty > 0.0);
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}
