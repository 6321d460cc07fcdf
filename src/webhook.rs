//! Inbound payment webhook.
//!
//! The payment provider delivers signed events; this module verifies the
//! signature against the shared secret, and on a completed checkout session
//! issues exactly one order-creation call against the content backend. A
//! signature failure rejects the single request (400-class). A downstream
//! creation failure is 500-class and must not be acknowledged, so the
//! provider retries delivery.

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

use crate::{
    checkout::Metadata,
    content::{NewOrder, NewOrderLine, OrderSink, TransportError},
    orders::OrderStatus,
};

type HmacSha256 = Hmac<Sha256>;

/// Default tolerance for the signed timestamp, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Errors from webhook verification and handling.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signature header was supplied.
    #[error("no signature header")]
    MissingSignature,

    /// The signature header did not parse as `t=<ts>,v1=<hex>`.
    #[error("malformed signature header")]
    MalformedSignature,

    /// The shared secret could not be used as an HMAC key.
    #[error("invalid webhook secret: {0}")]
    InvalidSecret(String),

    /// No supplied signature matched the payload digest.
    #[error("signature verification failed")]
    SignatureMismatch,

    /// The signed timestamp is outside the accepted tolerance.
    #[error("signed timestamp is {0}s away from now, outside tolerance")]
    StaleTimestamp(i64),

    /// The event payload was not valid JSON for an event envelope.
    #[error("failed to decode event payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A completed session carried no line item mapping back to a product.
    #[error("completed session has no resolvable line items")]
    NoLineItems,

    /// Writing the order to the content backend failed. The request must
    /// not be acknowledged so the sender retries.
    #[error("order creation failed: {0}")]
    OrderCreation(#[from] TransportError),
}

impl WebhookError {
    /// The HTTP status class the host should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            WebhookError::OrderCreation(_) => 500,
            _ => 400,
        }
    }
}

/// What the host should do with the delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    /// A completed checkout produced this order.
    OrderCreated {
        /// Backend document id of the new order.
        order_id: String,
    },

    /// The event type is not one this storefront acts on; acknowledged
    /// without effect.
    Ignored,
}

/// Compute the `t=<ts>,v1=<hex>` signature header for a payload.
///
/// The scheme signs `"{timestamp}.{payload}"` with HMAC-SHA256 under the
/// shared secret. Used by tests and local delivery tooling; verification
/// recomputes the same digest.
///
/// # Errors
///
/// Returns [`WebhookError::InvalidSecret`] when the secret cannot key the
/// HMAC.
pub fn sign(payload: &str, secret: &str, timestamp: i64) -> Result<String, WebhookError> {
    let digest = payload_digest(payload, secret, timestamp)?;

    Ok(format!("t={timestamp},v1={}", hex::encode(digest)))
}

/// Verify a signature header against the raw payload.
///
/// Accepts any of the `v1` entries in the header matching the recomputed
/// digest (comparison is constant-time), and rejects timestamps further
/// than `tolerance_secs` from `now_unix` in either direction.
///
/// # Errors
///
/// Returns a [`WebhookError`] naming the first check that failed; every
/// variant is fatal to this single request.
pub fn verify_signature(
    payload: &str,
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now_unix: i64,
) -> Result<(), WebhookError> {
    if header.is_empty() {
        return Err(WebhookError::MissingSignature);
    }

    let (timestamp, candidates) = parse_header(header)?;

    let age = (now_unix - timestamp).abs();
    if age > tolerance_secs {
        return Err(WebhookError::StaleTimestamp(age));
    }

    let mac = keyed_mac(payload, secret, timestamp)?;
    let verified = candidates.iter().any(|candidate| {
        hex::decode(candidate)
            .is_ok_and(|bytes| mac.clone().verify_slice(&bytes).is_ok())
    });

    if verified {
        Ok(())
    } else {
        log::warn!("webhook signature verification failed");
        Err(WebhookError::SignatureMismatch)
    }
}

/// Handle a verified event payload.
///
/// On `checkout.session.completed`, extracts the session's line items and
/// buyer metadata and issues exactly one [`OrderSink::create_order`] call.
/// Line items that cannot be mapped back to a catalog product are skipped;
/// a session where none can be mapped is rejected. Any other event type is
/// acknowledged without effect.
///
/// # Errors
///
/// - [`WebhookError::Payload`] when the envelope does not decode.
/// - [`WebhookError::NoLineItems`] when no line resolves to a product.
/// - [`WebhookError::OrderCreation`] when the backend write fails; the host
///   must answer 500 and not acknowledge.
pub fn handle_event<S: OrderSink>(
    payload: &str,
    sink: &S,
) -> Result<Acknowledgement, WebhookError> {
    let event: Event = serde_json::from_str(payload)?;

    if event.event_type != "checkout.session.completed" {
        return Ok(Acknowledgement::Ignored);
    }

    let session = event.data.object;
    let order = order_from_session(session)?;

    let order_id = sink.create_order(order)?;
    log::info!("webhook created order {order_id}");

    Ok(Acknowledgement::OrderCreated { order_id })
}

/// Verify and handle a delivery in one step.
///
/// # Errors
///
/// Returns the first failing check from [`verify_signature`] or
/// [`handle_event`].
pub fn process<S: OrderSink>(
    payload: &str,
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now_unix: i64,
    sink: &S,
) -> Result<Acknowledgement, WebhookError> {
    verify_signature(payload, header, secret, tolerance_secs, now_unix)?;
    handle_event(payload, sink)
}

fn keyed_mac(payload: &str, secret: &str, timestamp: i64) -> Result<HmacSha256, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| WebhookError::InvalidSecret(err.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());

    Ok(mac)
}

fn payload_digest(payload: &str, secret: &str, timestamp: i64) -> Result<Vec<u8>, WebhookError> {
    Ok(keyed_mac(payload, secret, timestamp)?
        .finalize()
        .into_bytes()
        .to_vec())
}

fn parse_header(header: &str) -> Result<(i64, Vec<String>), WebhookError> {
    let mut timestamp = None;
    let mut candidates = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => candidates.push(value.to_string()),
            _ => {}
        }
    }

    match (timestamp, candidates.is_empty()) {
        (Some(timestamp), false) => Ok((timestamp, candidates)),
        _ => Err(WebhookError::MalformedSignature),
    }
}

fn order_from_session(session: CheckoutSession) -> Result<NewOrder, WebhookError> {
    let lines: Vec<NewOrderLine> = session
        .line_items
        .map(|list| list.data)
        .unwrap_or_default()
        .into_iter()
        .filter_map(line_from_item)
        .collect();

    if lines.is_empty() {
        return Err(WebhookError::NoLineItems);
    }

    let total_price = session
        .amount_total
        .map_or_else(
            || {
                lines
                    .iter()
                    .map(|line| line.price * Decimal::from(line.quantity))
                    .sum::<Decimal>()
            },
            minor_to_decimal,
        );

    let amount_discount = session
        .total_details
        .and_then(|details| details.amount_discount)
        .map_or(Decimal::ZERO, minor_to_decimal);

    Ok(NewOrder {
        order_number: session.metadata.order_number,
        buyer_name: session.metadata.customer_name,
        buyer_email: session.metadata.customer_email,
        clerk_user_id: Some(session.metadata.clerk_user_id),
        lines,
        total_price,
        amount_discount,
        status: OrderStatus::Paid,
        created_at: session.created.map(iso8601_utc).unwrap_or_default(),
    })
}

fn line_from_item(item: SessionLineItem) -> Option<NewOrderLine> {
    let price = item.price?;
    let product = price.product?;
    let Some(product_id) = product.metadata.and_then(|m| m.id).filter(|id| !id.is_empty())
    else {
        log::warn!("skipping session line item without a product reference");
        return None;
    };

    let quantity = item.quantity.unwrap_or(0);
    if quantity == 0 {
        log::warn!("skipping session line item with zero quantity");
        return None;
    }

    Some(NewOrderLine {
        product_id,
        name: product.name.unwrap_or_else(|| "Unnamed Product".to_string()),
        price: price.unit_amount.map_or(Decimal::ZERO, minor_to_decimal),
        quantity,
    })
}

fn minor_to_decimal(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Format a unix timestamp (UTC seconds) as an RFC 3339 instant.
///
/// A timestamp outside the representable range formats as empty, the same
/// as an absent one.
fn iso8601_utc(secs: i64) -> String {
    Timestamp::from_second(secs)
        .map(|ts| ts.to_string())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: CheckoutSession,
}

/// A checkout session as embedded in a completed-checkout event, with line
/// items expanded at session creation.
#[derive(Debug, Deserialize)]
struct CheckoutSession {
    #[serde(default)]
    amount_total: Option<i64>,

    #[serde(default)]
    total_details: Option<TotalDetails>,

    metadata: Metadata,

    #[serde(default)]
    line_items: Option<LineItemList>,

    #[serde(default)]
    created: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TotalDetails {
    #[serde(default)]
    amount_discount: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LineItemList {
    #[serde(default)]
    data: Vec<SessionLineItem>,
}

#[derive(Debug, Deserialize)]
struct SessionLineItem {
    #[serde(default)]
    quantity: Option<u32>,

    #[serde(default)]
    price: Option<SessionPrice>,
}

#[derive(Debug, Deserialize)]
struct SessionPrice {
    #[serde(default)]
    unit_amount: Option<i64>,

    #[serde(default)]
    product: Option<SessionProduct>,
}

#[derive(Debug, Deserialize)]
struct SessionProduct {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    metadata: Option<ProductMetadata>,
}

#[derive(Debug, Deserialize)]
struct ProductMetadata {
    #[serde(default)]
    id: Option<String>,
}
