//! Line items and the product references they are built from.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::coerce::{self, first_present, to_number, to_text};
use crate::ids::ProductId;

/// One cart or order entry.
///
/// Serialized as `{ "id", "name", "price", "qty" }`. Deserialization is
/// lenient: numeric fields accept numbers or numeric text and anything
/// else reads as `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier, unique within a cart.
    #[serde(default)]
    pub id: ProductId,
    /// Display name.
    #[serde(default, deserialize_with = "coerce::text")]
    pub name: String,
    /// Unit price.
    #[serde(default, deserialize_with = "coerce::number")]
    pub price: f64,
    /// Quantity.
    #[serde(default, deserialize_with = "coerce::number")]
    pub qty: f64,
}

impl LineItem {
    /// Create a line item.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64, qty: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            qty,
        }
    }

    /// Normalize an item of unknown shape.
    ///
    /// Reads `id` falling back to `productId`, `name` falling back to
    /// `title`, and coerces `price` and `qty` to numbers.
    ///
    /// ```rust
    /// use pos_commerce::cart::LineItem;
    /// use serde_json::json;
    ///
    /// let item = LineItem::from_external(&json!({"productId": 7, "title": "Tea", "price": "45", "qty": 2}));
    /// assert_eq!(item, LineItem::new("7", "Tea", 45.0, 2.0));
    /// ```
    pub fn from_external(value: &Value) -> Self {
        Self {
            id: ProductId::new(
                first_present(value, &["id", "productId"])
                    .map(to_text)
                    .unwrap_or_default(),
            ),
            name: first_present(value, &["name", "title"])
                .map(to_text)
                .unwrap_or_default(),
            price: value.get("price").map(to_number).unwrap_or(0.0),
            qty: value.get("qty").map(to_number).unwrap_or(0.0),
        }
    }

    /// `price × qty`.
    pub fn subtotal(&self) -> f64 {
        self.price * self.qty
    }

    /// Name to show, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// `deserialize_with` adapter reading an item list of unknown shape
/// through [`LineItem::from_external`]. Anything but an array reads as no
/// items.
pub fn external_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LineItem>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values.iter().map(LineItem::from_external).collect(),
        _ => Vec::new(),
    })
}

/// What a storefront "add to cart" action carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product identifier. Empty means "nothing to add".
    pub id: ProductId,
    /// Display name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ProductRef {
    /// A reference with only an identifier.
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            price: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the unit price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Normalize a product document or button payload of unknown shape.
    pub fn from_external(value: &Value) -> Self {
        Self {
            id: ProductId::new(
                first_present(value, &["id", "productId"])
                    .map(to_text)
                    .unwrap_or_default(),
            ),
            name: first_present(value, &["name", "title"]).map(to_text),
            price: value.get("price").map(to_number),
        }
    }

    /// Build the line item this reference adds: name defaults to the
    /// identifier and price to `0`.
    pub fn to_line_item(&self, qty: f64) -> LineItem {
        LineItem {
            id: self.id.clone(),
            name: self
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| self.id.to_string()),
            price: self.price.map(coerce::finite_or_zero).unwrap_or(0.0),
            qty,
        }
    }
}
