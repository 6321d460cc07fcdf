//! Line removal from an order, and the confirmation flow around it.
//!
//! Removing a line is destructive, so the UI walks a small state machine:
//! `Normal` → `PendingConfirmation` → `Removing` → `Removed` or
//! `OrderDeleted`, with `cancel` and backend failure both returning to
//! `Normal`. Only one line may be in flight per order at a time; other
//! remove affordances are disabled while one is pending.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    content::{MutationError, OrderMutations, RemovalOutcome},
    orders::{Order, OrderLine},
};

/// Result of removing a line from an order, computed purely.
#[derive(Debug, Clone, PartialEq)]
pub enum LineRemoval {
    /// The removed line was the last one; the whole order record goes away.
    Deleted,

    /// The order survives with the given remaining lines.
    Updated(Order),
}

/// Remove a product's line from an order without touching any store.
///
/// Removing a line that no longer exists returns the order unchanged: the
/// request is already satisfied, which tolerates a concurrent edit having
/// removed it first.
pub fn remove_line(order: &Order, product_id: &str) -> LineRemoval {
    let remaining: SmallVec<[OrderLine; 4]> = order
        .lines
        .iter()
        .filter(|line| line.product_id != product_id)
        .cloned()
        .collect();

    if remaining.is_empty() {
        return LineRemoval::Deleted;
    }

    let mut updated = order.clone();
    updated.lines = remaining;
    LineRemoval::Updated(updated)
}

/// Where the removal flow for one order currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalState {
    /// No removal in progress.
    Normal,

    /// The user selected a line; awaiting their confirmation.
    PendingConfirmation(String),

    /// Confirmed; the backend request is in flight.
    Removing(String),

    /// The line was removed and the order survives.
    Removed(String),

    /// The removed line was the order's last; the order is gone.
    OrderDeleted,
}

/// Errors from driving the removal flow.
#[derive(Debug, Error)]
pub enum RemovalError {
    /// A removal is already pending or in flight for this order.
    #[error("another removal is already in progress for this order")]
    RemovalInFlight,

    /// `cancel` or `confirm` was called with nothing pending.
    #[error("no removal is awaiting confirmation")]
    NothingPending,

    /// The order was already deleted by a previous removal.
    #[error("the order no longer exists")]
    OrderGone,

    /// The backend failed to apply the removal; the flow returned to
    /// `Normal` and the message should be surfaced to the user.
    #[error(transparent)]
    Mutation(#[from] MutationError),
}

/// Drives the line-removal state machine for a single order.
#[derive(Debug)]
pub struct RemovalFlow {
    order_id: String,
    state: RemovalState,
}

impl RemovalFlow {
    /// Start a flow for the given order, in `Normal` state.
    pub fn new(order_id: impl Into<String>) -> Self {
        RemovalFlow {
            order_id: order_id.into(),
            state: RemovalState::Normal,
        }
    }

    /// Current state.
    pub fn state(&self) -> &RemovalState {
        &self.state
    }

    /// Select a line for removal, moving to `PendingConfirmation`.
    ///
    /// # Errors
    ///
    /// - [`RemovalError::RemovalInFlight`] when another line is already
    ///   pending or being removed.
    /// - [`RemovalError::OrderGone`] when the order was already deleted.
    pub fn begin(&mut self, product_id: impl Into<String>) -> Result<(), RemovalError> {
        match &self.state {
            RemovalState::Normal | RemovalState::Removed(_) => {
                self.state = RemovalState::PendingConfirmation(product_id.into());
                Ok(())
            }
            RemovalState::PendingConfirmation(_) | RemovalState::Removing(_) => {
                Err(RemovalError::RemovalInFlight)
            }
            RemovalState::OrderDeleted => Err(RemovalError::OrderGone),
        }
    }

    /// Abandon the pending removal, returning to `Normal`.
    ///
    /// # Errors
    ///
    /// Returns [`RemovalError::NothingPending`] when no removal is awaiting
    /// confirmation.
    pub fn cancel(&mut self) -> Result<(), RemovalError> {
        match &self.state {
            RemovalState::PendingConfirmation(_) => {
                self.state = RemovalState::Normal;
                Ok(())
            }
            _ => Err(RemovalError::NothingPending),
        }
    }

    /// Confirm the pending removal and apply it through the backend.
    ///
    /// On success the flow ends in `Removed` or `OrderDeleted` according to
    /// the outcome. On backend failure the flow returns to `Normal` and the
    /// error carries the backend's message; nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`RemovalError::NothingPending`] when no removal is awaiting
    ///   confirmation.
    /// - [`RemovalError::Mutation`] when the backend rejects the removal.
    pub fn confirm<B: OrderMutations>(
        &mut self,
        backend: &B,
    ) -> Result<RemovalOutcome, RemovalError> {
        let RemovalState::PendingConfirmation(product_id) = &self.state else {
            return Err(RemovalError::NothingPending);
        };
        let product_id = product_id.clone();

        self.state = RemovalState::Removing(product_id.clone());

        match backend.remove_order_line(&self.order_id, &product_id) {
            Ok(outcome) => {
                self.state = if outcome.deleted {
                    RemovalState::OrderDeleted
                } else {
                    RemovalState::Removed(product_id)
                };
                Ok(outcome)
            }
            Err(err) => {
                log::warn!("order {} line removal failed: {err}", self.order_id);
                self.state = RemovalState::Normal;
                Err(RemovalError::Mutation(err))
            }
        }
    }
}
