//! Payment checkout boundary.
//!
//! Basket lines are normalized into payment-provider line items here: prices
//! move from currency-agnostic decimals to minor units in a concrete
//! currency, invalid items are filtered out before the provider ever sees
//! them, and the product id travels in the line-item metadata so the webhook
//! can map the session back to catalog products. Session creation itself is
//! behind [`CheckoutProvider`]; on failure the caller must show an error and
//! must not redirect.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::basket::BasketLine;

/// Errors from preparing or creating a checkout session.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Every basket line was filtered out by the validity preconditions.
    #[error("no valid items in basket")]
    NoValidItems,

    /// A price could not be represented in minor units.
    #[error("price of product {0} is out of range for minor units")]
    AmountOutOfRange(String),

    /// The payment provider refused or failed to create the session.
    #[error("checkout session creation failed: {0}")]
    Provider(String),

    /// Money arithmetic failed while totalling the session.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Buyer metadata attached to the checkout session and echoed back by the
/// payment webhook. Wire names are camelCase to match the provider-side
/// metadata keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Human-facing order number, generated before the session.
    pub order_number: String,

    /// Buyer display name.
    pub customer_name: String,

    /// Buyer email.
    pub customer_email: String,

    /// Auth-provider user id of the buyer.
    pub clerk_user_id: String,
}

/// One normalized line handed to the payment provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Catalog product id, carried in the provider-side metadata.
    pub product_id: String,

    /// Product name shown on the payment page.
    pub name: String,

    /// Unit price in minor units of the session currency.
    pub unit_amount: Money<'static, Currency>,

    /// Units purchased.
    pub quantity: u32,
}

/// Redirect URL of a created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutUrl(
    /// The hosted payment page the buyer is sent to.
    pub String,
);

/// The redirect targets a session is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    /// Where the provider sends the buyer after payment.
    pub success: String,

    /// Where the provider sends the buyer on cancel.
    pub cancel: String,
}

impl RedirectUrls {
    /// Build the storefront's redirect pair from its base URL.
    ///
    /// The success URL carries the provider's session-id placeholder and the
    /// order number; cancel returns to the basket page.
    pub fn from_base(base_url: &str, order_number: &str) -> Self {
        let base = base_url.trim_end_matches('/');

        RedirectUrls {
            success: format!(
                "{base}/success?session_id={{CHECKOUT_SESSION_ID}}&orderNumber={order_number}"
            ),
            cancel: format!("{base}/basket"),
        }
    }
}

/// External payment provider able to create a hosted checkout session.
pub trait CheckoutProvider {
    /// Create a session for the given items, returning its redirect URL.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when the provider rejects the session;
    /// the caller must surface the error and must not redirect.
    fn create_session(
        &self,
        items: &[LineItem],
        metadata: &Metadata,
        redirects: &RedirectUrls,
    ) -> Result<CheckoutUrl, CheckoutError>;
}

/// Normalize basket lines into provider line items.
///
/// Lines with a non-positive price or an empty product id are silently
/// excluded before the provider call, mirroring the session precondition
/// that every item has a positive price and a valid product identity.
///
/// # Errors
///
/// - [`CheckoutError::NoValidItems`] when nothing survives the filter.
/// - [`CheckoutError::AmountOutOfRange`] when a price does not fit in minor
///   units.
pub fn build_line_items(
    lines: &[BasketLine],
    currency: &'static Currency,
) -> Result<Vec<LineItem>, CheckoutError> {
    let valid: Vec<&BasketLine> = lines
        .iter()
        .filter(|line| !line.product.id.is_empty() && line.product.price > Decimal::ZERO)
        .collect();

    if valid.is_empty() {
        return Err(CheckoutError::NoValidItems);
    }

    valid
        .into_iter()
        .map(|line| {
            let minor = to_minor_units(line.product.price)
                .ok_or_else(|| CheckoutError::AmountOutOfRange(line.product.id.clone()))?;

            Ok(LineItem {
                product_id: line.product.id.clone(),
                name: line.product.name.clone(),
                unit_amount: Money::from_minor(minor, currency),
                quantity: line.quantity,
            })
        })
        .collect()
}

/// Total of a session, Σ `unit_amount × quantity`, in the currency of the
/// items. `None` for an empty item list.
///
/// # Errors
///
/// Returns a [`CheckoutError::Money`] when the addition mixes currencies,
/// or [`CheckoutError::AmountOutOfRange`] when a line total overflows minor
/// units.
pub fn session_total(
    items: &[LineItem],
) -> Result<Option<Money<'static, Currency>>, CheckoutError> {
    let Some(first) = items.first() else {
        return Ok(None);
    };

    let mut total = Money::from_minor(0, first.unit_amount.currency());
    for item in items {
        let line_minor = item
            .unit_amount
            .to_minor_units()
            .checked_mul(i64::from(item.quantity))
            .ok_or_else(|| CheckoutError::AmountOutOfRange(item.product_id.clone()))?;
        total = total.add(Money::from_minor(line_minor, item.unit_amount.currency()))?;
    }

    Ok(Some(total))
}

fn to_minor_units(price: Decimal) -> Option<i64> {
    (price * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
