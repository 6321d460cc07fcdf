//! Basket aggregation.
//!
//! The basket is an explicit state object owned by the session layer and
//! injected where needed; nothing reaches for it as ambient global state.
//! Every operation is synchronous and mutates only the basket itself; no
//! network call happens here. Persistence across sessions is an explicit
//! serialize/deserialize boundary in [`persist`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;

pub mod persist;

/// Errors rejected by basket operations before any state change.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasketError {
    /// `add_item` was called with a zero quantity.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// `add_item` was called with a product that has no id.
    #[error("product has no id; cannot be added to the basket")]
    MissingProductId,
}

/// How much of a product `remove_item` takes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Decrement the line quantity by exactly 1, deleting the line when it
    /// would reach 0.
    One,

    /// Delete the whole line regardless of quantity.
    All,
}

/// One aggregated (product, quantity) entry in the basket.
///
/// At most one line exists per distinct product id; adding an already-present
/// product merges into its line rather than duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketLine {
    /// The product being purchased.
    pub product: Product,

    /// Units of the product. Always at least 1.
    pub quantity: u32,
}

/// A buyer's pending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    lines: Vec<BasketLine>,
}

impl Basket {
    /// Create an empty basket.
    pub fn new() -> Self {
        Basket::default()
    }

    /// Build a basket from lines, re-applying the one-line-per-product
    /// invariant: duplicate product ids are merged by summing quantities and
    /// zero-quantity lines are dropped. Used when restoring a snapshot that
    /// may predate the invariant.
    pub fn from_lines(lines: impl IntoIterator<Item = BasketLine>) -> Self {
        let mut basket = Basket::new();

        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            // Invalid lines in a stale snapshot are dropped, not errors.
            basket.add_item(line.product, line.quantity).ok();
        }

        basket
    }

    /// Add `quantity` units of a product, merging into an existing line.
    ///
    /// # Errors
    ///
    /// - [`BasketError::ZeroQuantity`] when `quantity` is 0.
    /// - [`BasketError::MissingProductId`] when the product has no id.
    ///
    /// Both are rejected before any state change.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> Result<(), BasketError> {
        if quantity == 0 {
            return Err(BasketError::ZeroQuantity);
        }
        if product.id.is_empty() {
            return Err(BasketError::MissingProductId);
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(BasketLine { product, quantity });
        }

        Ok(())
    }

    /// Remove a product: one unit or the whole line, per `removal`.
    ///
    /// Decrementing a quantity-1 line deletes the line. Removing a product
    /// that is not in the basket is a no-op.
    pub fn remove_item(&mut self, product_id: &str, removal: Removal) {
        self.lines.retain_mut(|line| {
            if line.product.id != product_id {
                return true;
            }
            match removal {
                Removal::All => false,
                Removal::One => {
                    line.quantity = line.quantity.saturating_sub(1);
                    line.quantity > 0
                }
            }
        });
    }

    /// Empty the basket unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ price × quantity over the lines.
    ///
    /// Lines whose product price is negative are skipped rather than summed
    /// or rejected. This is a deliberate tolerance for partially-loaded
    /// product data arriving through a stale snapshot, not silent data loss:
    /// the line stays in the basket and is repriced once the product loads.
    pub fn total_price(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|line| line.product.price >= Decimal::ZERO)
            .map(|line| line.product.price * Decimal::from(line.quantity))
            .sum()
    }

    /// Quantity of a product in the basket, 0 when absent.
    pub fn item_count(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product.id == product_id)
            .map_or(0, |line| line.quantity)
    }

    /// The aggregated lines, in insertion order.
    pub fn lines(&self) -> &[BasketLine] {
        &self.lines
    }

    /// Number of distinct product lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the basket has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::fixtures;

    use super::*;

    fn lamp() -> Product {
        fixtures::product("p-lamp")
    }

    fn rug() -> Product {
        fixtures::product("p-rug")
    }

    #[test]
    fn adding_the_same_product_merges_quantities() -> TestResult {
        let mut basket = Basket::new();

        basket.add_item(lamp(), 2)?;
        basket.add_item(lamp(), 3)?;

        assert_eq!(basket.len(), 1, "one line per distinct product");
        assert_eq!(basket.item_count("p-lamp"), 5);

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected_before_any_change() {
        let mut basket = Basket::new();

        let result = basket.add_item(lamp(), 0);

        assert_eq!(result, Err(BasketError::ZeroQuantity));
        assert!(basket.is_empty());
    }

    #[test]
    fn a_product_without_id_is_rejected() {
        let mut basket = Basket::new();
        let mut ghost = lamp();
        ghost.id = String::new();

        let result = basket.add_item(ghost, 1);

        assert_eq!(result, Err(BasketError::MissingProductId));
        assert!(basket.is_empty());
    }

    #[test]
    fn removing_one_from_a_quantity_one_line_deletes_it() -> TestResult {
        let mut basket = Basket::new();
        basket.add_item(lamp(), 1)?;

        basket.remove_item("p-lamp", Removal::One);

        assert_eq!(basket.item_count("p-lamp"), 0);
        assert!(basket.is_empty());

        Ok(())
    }

    #[test]
    fn removing_one_from_a_quantity_three_line_leaves_two() -> TestResult {
        let mut basket = Basket::new();
        basket.add_item(lamp(), 3)?;

        basket.remove_item("p-lamp", Removal::One);

        assert_eq!(basket.item_count("p-lamp"), 2);

        Ok(())
    }

    #[test]
    fn remove_all_deletes_the_line_regardless_of_quantity() -> TestResult {
        let mut basket = Basket::new();
        basket.add_item(lamp(), 7)?;

        basket.remove_item("p-lamp", Removal::All);

        assert_eq!(basket.item_count("p-lamp"), 0);

        Ok(())
    }

    #[test]
    fn removing_an_absent_product_is_a_no_op() -> TestResult {
        let mut basket = Basket::new();
        basket.add_item(lamp(), 1)?;

        basket.remove_item("p-ghost", Removal::All);

        assert_eq!(basket.len(), 1);

        Ok(())
    }

    #[test]
    fn total_price_sums_price_times_quantity() -> TestResult {
        let mut basket = Basket::new();
        let mut hundred = lamp();
        hundred.price = Decimal::from(100);
        let mut fifty = rug();
        fifty.price = Decimal::from(50);

        basket.add_item(hundred, 2)?;
        basket.add_item(fifty, 1)?;

        assert_eq!(basket.total_price(), Decimal::from(250));

        Ok(())
    }

    #[test]
    fn a_negative_price_line_is_excluded_from_the_total() -> TestResult {
        let mut basket = Basket::new();
        let mut broken = lamp();
        broken.price = Decimal::from(-1);
        let mut fine = rug();
        fine.price = Decimal::from(50);

        basket.add_item(broken, 2)?;
        basket.add_item(fine, 1)?;

        assert_eq!(basket.total_price(), Decimal::from(50));
        assert_eq!(basket.len(), 2, "the line itself stays in the basket");

        Ok(())
    }

    #[test]
    fn clear_empties_unconditionally() -> TestResult {
        let mut basket = Basket::new();
        basket.add_item(lamp(), 2)?;
        basket.add_item(rug(), 1)?;

        basket.clear();

        assert!(basket.is_empty());
        assert_eq!(basket.total_price(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn from_lines_merges_duplicates_and_drops_zero_quantities() {
        let basket = Basket::from_lines(vec![
            BasketLine {
                product: lamp(),
                quantity: 2,
            },
            BasketLine {
                product: lamp(),
                quantity: 3,
            },
            BasketLine {
                product: rug(),
                quantity: 0,
            },
        ]);

        assert_eq!(basket.len(), 1);
        assert_eq!(basket.item_count("p-lamp"), 5);
    }
}
