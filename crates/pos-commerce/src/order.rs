//! Open orders kept in the document service.

use serde::{Deserialize, Serialize};

use crate::cart::{external_items, Cart, LineItem};
use crate::coerce;
use crate::error::CommerceError;
use crate::ids::{CompanyId, OrderId, UserId};
use crate::timestamp::{sort_newest_first, Timestamp};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed at the register, not yet settled.
    #[default]
    Open,
    /// Settled.
    Closed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Closed => "closed",
        }
    }
}

/// An order document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document identifier. Assigned by the store, so absent from the body.
    #[serde(default, skip_serializing_if = "OrderId::is_empty")]
    pub id: OrderId,
    #[serde(default)]
    pub uid: UserId,
    /// Empty when the ordering user belongs to no company.
    #[serde(default)]
    pub company_id: CompanyId,
    #[serde(default, deserialize_with = "external_items")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Order {
    /// Build an open order from a cart. The identifier is left empty for
    /// the store to assign.
    pub fn from_cart(
        uid: UserId,
        company_id: Option<CompanyId>,
        cart: &Cart,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        Ok(Self {
            id: OrderId::default(),
            uid,
            company_id: company_id.unwrap_or_default(),
            items: cart.items().to_vec(),
            total: cart.total(),
            status: OrderStatus::Open,
            created_at: Some(Timestamp::now()),
        })
    }

    /// Company the order belongs to, if any.
    pub fn company(&self) -> Option<&CompanyId> {
        (!self.company_id.is_empty()).then_some(&self.company_id)
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Total quantity across the order's items.
    pub fn item_count(&self) -> f64 {
        self.items.iter().map(|i| coerce::finite_or_zero(i.qty)).sum()
    }

    /// Rebuild a cart from the order's items.
    pub fn to_cart(&self) -> Cart {
        Cart::from_items(self.items.iter().cloned())
    }
}

/// Sort orders newest first by `createdAt`; orders without one go last.
pub fn sort_orders_newest_first(orders: &mut [Order]) {
    sort_newest_first(orders, |o| o.created_at.as_ref());
}
