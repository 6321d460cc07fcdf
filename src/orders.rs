//! Order projections.
//!
//! Orders are created by the payment webhook and live in the content backend;
//! this crate consumes them read-only, apart from the single line-removal
//! mutation in [`removal`]. An order never exists with zero lines: removing
//! the last line deletes the order record itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub mod removal;
pub mod sellers;

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting payment confirmation.
    Pending,

    /// Payment received.
    Paid,

    /// Handed to the carrier.
    Shipped,

    /// Received by the buyer.
    Delivered,

    /// Cancelled before fulfilment.
    Cancelled,
}

/// One (product, quantity) line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Referenced product id.
    pub product_id: String,

    /// Product name as sold.
    pub name: String,

    /// Unit price paid.
    pub price: Decimal,

    /// Units purchased. Always at least 1.
    pub quantity: u32,
}

/// An order record as stored by the content backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Backend document id.
    pub id: String,

    /// Human-facing order number.
    pub order_number: String,

    /// Buyer display name.
    pub buyer_name: String,

    /// Buyer email.
    pub buyer_email: String,

    /// Auth-provider user id of the buyer, when known.
    pub clerk_user_id: Option<String>,

    /// Purchased lines. Never empty for a stored order.
    pub lines: SmallVec<[OrderLine; 4]>,

    /// Total paid after discount.
    pub total_price: Decimal,

    /// Discount applied at checkout.
    pub amount_discount: Decimal,

    /// Fulfilment status.
    pub status: OrderStatus,

    /// Creation timestamp as reported by the backend (ISO 8601).
    pub created_at: String,
}

impl Order {
    /// Quantity of a given product in this order, 0 when absent.
    pub fn line_quantity(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }
}
