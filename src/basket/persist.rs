//! Basket persistence boundary.
//!
//! The basket survives reloads by being snapshotted to JSON at session end
//! and restored at session start. Restoration goes through
//! [`Basket::from_lines`], so a snapshot written before the one-line-per-
//! product invariant existed is repaired on load rather than trusted.

use std::{fs, path::Path};

use thiserror::Error;

use crate::basket::{Basket, BasketLine};

/// Errors crossing the persistence boundary.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the snapshot file failed.
    #[error("failed to access basket snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot was not valid JSON for a basket.
    #[error("failed to decode basket snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize the basket to a JSON string.
///
/// # Errors
///
/// Returns a [`PersistError::Json`] when serialization fails.
pub fn to_json(basket: &Basket) -> Result<String, PersistError> {
    Ok(serde_json::to_string(basket.lines())?)
}

/// Rebuild a basket from a JSON snapshot, repairing invariant violations.
///
/// # Errors
///
/// Returns a [`PersistError::Json`] when the snapshot cannot be decoded.
pub fn from_json(json: &str) -> Result<Basket, PersistError> {
    let lines: Vec<BasketLine> = serde_json::from_str(json)?;

    Ok(Basket::from_lines(lines))
}

/// Write the basket snapshot to a file.
///
/// # Errors
///
/// Returns a [`PersistError`] when serialization or the write fails.
pub fn save(basket: &Basket, path: &Path) -> Result<(), PersistError> {
    fs::write(path, to_json(basket)?)?;

    Ok(())
}

/// Load a basket snapshot from a file.
///
/// # Errors
///
/// Returns a [`PersistError`] when the file cannot be read or decoded.
pub fn load(path: &Path) -> Result<Basket, PersistError> {
    from_json(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::fixtures;

    use super::*;

    #[test]
    fn snapshot_round_trips() -> TestResult {
        let mut basket = Basket::new();
        basket.add_item(fixtures::product("p-lamp"), 2)?;
        basket.add_item(fixtures::product("p-rug"), 1)?;

        let restored = from_json(&to_json(&basket)?)?;

        assert_eq!(restored, basket);
        assert_eq!(restored.total_price(), basket.total_price());

        Ok(())
    }

    #[test]
    fn save_and_load_through_a_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("basket.json");
        let mut basket = Basket::new();
        basket.add_item(fixtures::product("p-lamp"), 3)?;

        save(&basket, &path)?;
        let restored = load(&path)?;

        assert_eq!(restored.item_count("p-lamp"), 3);

        Ok(())
    }

    #[test]
    fn a_corrupt_snapshot_is_an_error_not_a_crash() {
        let result = from_json("{not json");

        assert!(matches!(result, Err(PersistError::Json(_))));
    }

    #[test]
    fn duplicate_lines_in_a_stale_snapshot_are_merged_on_load() -> TestResult {
        let product = fixtures::product("p-lamp");
        let duplicated = serde_json::to_string(&vec![
            crate::basket::BasketLine {
                product: product.clone(),
                quantity: 1,
            },
            crate::basket::BasketLine {
                product,
                quantity: 2,
            },
        ])?;

        let restored = from_json(&duplicated)?;

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.item_count("p-lamp"), 3);
        assert!(restored.total_price() > Decimal::ZERO);

        Ok(())
    }
}
