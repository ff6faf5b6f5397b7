//! Shopping cart module.
//!
//! Contains the line item type, the references items are added from, and
//! the cart arithmetic.

mod cart;
mod line_item;

pub use cart::Cart;
pub use line_item::{external_items, LineItem, ProductRef};
