//! Point-of-sale domain types.
//!
//! - **Cart**: line items, merge-by-product arithmetic, normalization of
//!   items coming from other documents
//! - **Drafts**: named cart snapshots kept on the device
//! - **Orders**: open orders kept in the document service
//! - **Payroll**: attendance pairing and gross pay
//!
//! # Example
//!
//! ```rust
//! use pos_commerce::prelude::*;
//!
//! let mut cart = Cart::new();
//! cart.add_item(&ProductRef::new("p1").with_name("Mug").with_price(100.0), 2.0)?;
//! cart.add_item(&ProductRef::new("p2").with_price(50.0), 1.0)?;
//!
//! assert_eq!(cart.total(), 250.0);
//! assert_eq!(cart.count(), 3.0);
//! assert_eq!(Currency::PHP.format(cart.total()), "\u{20b1}250.00");
//! # Ok::<(), CommerceError>(())
//! ```

pub mod coerce;
pub mod error;
pub mod ids;
pub mod money;
pub mod timestamp;

pub mod cart;
pub mod draft;
pub mod order;
pub mod payroll;

pub use error::CommerceError;
pub use ids::*;
pub use money::Currency;
pub use timestamp::Timestamp;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Currency;
    pub use crate::timestamp::{epoch_millis, sort_newest_first, Timestamp};

    pub use crate::cart::{Cart, LineItem, ProductRef};
    pub use crate::draft::DraftOrder;
    pub use crate::order::{sort_orders_newest_first, Order, OrderStatus};
    pub use crate::payroll::{
        daily_summary, worked_hours, AttendanceAction, AttendanceRecord, DailyAttendance,
        PayPeriod, Payroll,
    };
}
