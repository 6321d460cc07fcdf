//! Boundary contracts for the content backend.
//!
//! The document store behind the storefront is an external collaborator; this
//! module defines the request/response contracts the core consumes and an
//! in-memory implementation for tests and demos. A failed fetch surfaces a
//! [`TransportError`] and the caller renders a defined empty state; the core
//! never crashes on backend unavailability.

use std::cell::RefCell;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{Category, Product},
    orders::{Order, OrderLine, OrderStatus, removal},
};

/// Transport-level failure talking to the backend.
///
/// Re-fetching is idempotent, so hosts may offer a retry affordance; the core
/// never retries automatically.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend could not be reached.
    #[error("content backend unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed the request.
    #[error("content backend request failed: {0}")]
    Request(String),
}

/// Read-side queries into the content backend.
pub trait ContentQuery {
    /// All products visible to the storefront.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the backend cannot be reached.
    fn fetch_products(&self) -> Result<Vec<Product>, TransportError>;

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the backend cannot be reached.
    fn fetch_categories(&self) -> Result<Vec<Category>, TransportError>;

    /// Orders placed by a buyer, matched by auth id or email.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the backend cannot be reached.
    fn fetch_orders_by_buyer(&self, buyer: &str) -> Result<Vec<Order>, TransportError>;

    /// Every order, as candidate input to the seller-ownership projection.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the backend cannot be reached.
    fn fetch_order_candidates(&self) -> Result<Vec<Order>, TransportError>;
}

/// Result of a line-removal mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalOutcome {
    /// `true` when the removed line was the order's last and the whole order
    /// record was deleted.
    pub deleted: bool,
}

/// Failure of an order mutation, carrying the backend's human-readable
/// message. Never retried automatically: order mutation is not idempotent
/// from the caller's point of view.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The referenced order does not exist.
    #[error("order {0} not found")]
    OrderNotFound(String),

    /// The backend failed to apply the mutation.
    #[error("failed to update order: {0}")]
    Backend(String),
}

/// Write-side order mutations.
pub trait OrderMutations {
    /// Remove one product's line from an order.
    ///
    /// Removing the last remaining line deletes the order record entirely
    /// (`deleted = true`). Removing a line that no longer exists is treated
    /// as already satisfied and succeeds with `deleted = false`, tolerating
    /// concurrent edits.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] when the order does not exist or the
    /// backend fails to apply the change.
    fn remove_order_line(
        &self,
        order_id: &str,
        product_id: &str,
    ) -> Result<RemovalOutcome, MutationError>;
}

/// One line of an order about to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderLine {
    /// Referenced product id.
    pub product_id: String,

    /// Product name as sold.
    pub name: String,

    /// Unit price paid.
    pub price: Decimal,

    /// Units purchased.
    pub quantity: u32,
}

/// An order ready to be written to the backend, produced by the payment
/// webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Human-facing order number.
    pub order_number: String,

    /// Buyer display name.
    pub buyer_name: String,

    /// Buyer email.
    pub buyer_email: String,

    /// Auth-provider user id of the buyer, when known.
    pub clerk_user_id: Option<String>,

    /// Purchased lines.
    pub lines: Vec<NewOrderLine>,

    /// Total paid after discount.
    pub total_price: Decimal,

    /// Discount applied at checkout.
    pub amount_discount: Decimal,

    /// Initial status.
    pub status: OrderStatus,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// Order creation target for the payment webhook.
pub trait OrderSink {
    /// Persist a new order, returning its backend document id.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the order could not be written; the
    /// webhook then refuses to acknowledge receipt so the sender retries.
    fn create_order(&self, order: NewOrder) -> Result<String, TransportError>;
}

/// In-memory content backend for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryContent {
    products: Vec<Product>,
    categories: Vec<Category>,
    orders: RefCell<Vec<Order>>,
    next_order_id: RefCell<u64>,
}

impl MemoryContent {
    /// Build a backend over the given documents.
    pub fn new(products: Vec<Product>, categories: Vec<Category>, orders: Vec<Order>) -> Self {
        MemoryContent {
            products,
            categories,
            orders: RefCell::new(orders),
            next_order_id: RefCell::new(1),
        }
    }

    /// Snapshot of the stored orders.
    pub fn orders(&self) -> Vec<Order> {
        self.orders.borrow().clone()
    }
}

impl ContentQuery for MemoryContent {
    fn fetch_products(&self) -> Result<Vec<Product>, TransportError> {
        Ok(self.products.clone())
    }

    fn fetch_categories(&self) -> Result<Vec<Category>, TransportError> {
        Ok(self.categories.clone())
    }

    fn fetch_orders_by_buyer(&self, buyer: &str) -> Result<Vec<Order>, TransportError> {
        Ok(self
            .orders
            .borrow()
            .iter()
            .filter(|order| {
                order.buyer_email == buyer || order.clerk_user_id.as_deref() == Some(buyer)
            })
            .cloned()
            .collect())
    }

    fn fetch_order_candidates(&self) -> Result<Vec<Order>, TransportError> {
        Ok(self.orders.borrow().clone())
    }
}

impl OrderMutations for MemoryContent {
    fn remove_order_line(
        &self,
        order_id: &str,
        product_id: &str,
    ) -> Result<RemovalOutcome, MutationError> {
        let mut orders = self.orders.borrow_mut();
        let Some(index) = orders.iter().position(|order| order.id == order_id) else {
            return Err(MutationError::OrderNotFound(order_id.to_string()));
        };
        let Some(order) = orders.get(index) else {
            return Err(MutationError::OrderNotFound(order_id.to_string()));
        };

        match removal::remove_line(order, product_id) {
            removal::LineRemoval::Deleted => {
                orders.remove(index);
                Ok(RemovalOutcome { deleted: true })
            }
            removal::LineRemoval::Updated(updated) => {
                if let Some(slot) = orders.get_mut(index) {
                    *slot = updated;
                }
                Ok(RemovalOutcome { deleted: false })
            }
        }
    }
}

impl OrderSink for MemoryContent {
    fn create_order(&self, order: NewOrder) -> Result<String, TransportError> {
        let mut next = self.next_order_id.borrow_mut();
        let id = format!("order-{next}");
        *next += 1;

        let lines: SmallVec<[OrderLine; 4]> = order
            .lines
            .into_iter()
            .map(|line| OrderLine {
                product_id: line.product_id,
                name: line.name,
                price: line.price,
                quantity: line.quantity,
            })
            .collect();

        self.orders.borrow_mut().push(Order {
            id: id.clone(),
            order_number: order.order_number,
            buyer_name: order.buyer_name,
            buyer_email: order.buyer_email,
            clerk_user_id: order.clerk_user_id,
            lines,
            total_price: order.total_price,
            amount_discount: order.amount_discount,
            status: order.status,
            created_at: order.created_at,
        });

        Ok(id)
    }
}
