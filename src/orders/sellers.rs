//! Seller view over buyer orders.
//!
//! A seller sees only the orders containing at least one of their own
//! products, and within each such order only their own lines. This is a pure
//! read-side projection; the underlying order store is never mutated.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    catalog::{Owner, Product},
    orders::{Order, OrderLine, OrderStatus},
};

/// Identity of the seller requesting the view.
///
/// Matches an [`Owner`] when the ids match or the emails match; an identity
/// with neither field set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerIdentity {
    /// Auth-provider user id.
    pub id: Option<String>,

    /// Seller email.
    pub email: Option<String>,
}

impl SellerIdentity {
    /// Whether this identity matches a product owner.
    pub fn matches(&self, owner: &Owner) -> bool {
        let id_match = match (&self.id, &owner.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        let email_match = match (&self.email, &owner.email) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };

        id_match || email_match
    }
}

/// One order as seen by a seller: lines narrowed to the seller's own
/// products, with derived money fields.
///
/// The discount fields reconstruct a proportional allocation from the stored
/// totals: `discount_percent = amount_discount / (total_price +
/// amount_discount)`. The original checkout may have allocated its discount
/// per line, which is not recoverable from the stored data, so this is an
/// approximation rather than a guaranteed-correct reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerOrderView {
    /// Backend document id of the order.
    pub order_id: String,

    /// Human-facing order number.
    pub order_number: String,

    /// Buyer display name.
    pub buyer_name: String,

    /// Buyer email.
    pub buyer_email: String,

    /// Fulfilment status.
    pub status: OrderStatus,

    /// Creation timestamp.
    pub created_at: String,

    /// Only the seller's own lines. Never empty.
    pub lines: SmallVec<[OrderLine; 4]>,

    /// Σ line price × quantity over the visible lines, before discount.
    pub gross: Decimal,

    /// Reconstructed order-wide discount percentage (0 to 100).
    pub discount_percent: Decimal,

    /// Discount share attributed to the visible lines, rounded to 2 dp.
    pub effective_discount: Decimal,

    /// `gross - effective_discount`.
    pub net: Decimal,
}

/// Project the orders visible to a seller.
///
/// Ownership is resolved from the product catalog: the seller's product ids
/// are collected first, then each order's lines are narrowed to that set.
/// Orders left with zero visible lines are excluded entirely rather than
/// returned empty.
pub fn resolve_for_seller(
    orders: &[Order],
    products: &[Product],
    seller: &SellerIdentity,
) -> Vec<SellerOrderView> {
    let owned_ids: FxHashSet<&str> = products
        .iter()
        .filter(|product| {
            product
                .owner
                .as_ref()
                .is_some_and(|owner| seller.matches(owner))
        })
        .map(|product| product.id.as_str())
        .collect();

    orders
        .iter()
        .filter_map(|order| project_order(order, &owned_ids))
        .collect()
}

fn project_order(order: &Order, owned_ids: &FxHashSet<&str>) -> Option<SellerOrderView> {
    let lines: SmallVec<[OrderLine; 4]> = order
        .lines
        .iter()
        .filter(|line| owned_ids.contains(line.product_id.as_str()))
        .cloned()
        .collect();

    if lines.is_empty() {
        return None;
    }

    let gross: Decimal = lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum();

    let discount_percent = discount_percent(order);
    let effective_discount = (gross * discount_percent / Decimal::from(100)).round_dp(2);

    Some(SellerOrderView {
        order_id: order.id.clone(),
        order_number: order.order_number.clone(),
        buyer_name: order.buyer_name.clone(),
        buyer_email: order.buyer_email.clone(),
        status: order.status,
        created_at: order.created_at.clone(),
        lines,
        gross,
        discount_percent,
        effective_discount,
        net: gross - effective_discount,
    })
}

/// Discount percentage reconstructed from the stored totals.
///
/// `total_price` is stored after discount, so the pre-discount amount is
/// `total_price + amount_discount`. Orders without a discount (or with a
/// degenerate zero pre-discount total) report 0.
fn discount_percent(order: &Order) -> Decimal {
    let pre_discount = order.total_price + order.amount_discount;

    if order.amount_discount <= Decimal::ZERO || pre_discount <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    order.amount_discount * Decimal::from(100) / pre_discount
}
