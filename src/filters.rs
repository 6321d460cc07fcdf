//! Product filtering for the "products near me" view.
//!
//! Filtering is a pure function over the catalog: category, price, rating and
//! radius predicates are AND-ed together, with the category predicate OR-ing
//! across a product's own categories. No index is maintained; the expected
//! catalog size for a viewport is tens to low thousands of products, so full
//! recomputation on every filter change is the design.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Product,
    geo::{self, ReferencePoint},
};

/// The filter state owned by a browsing session.
///
/// A pure value type. It is never persisted server-side; a host may serialize
/// it client-side for continuity across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected category titles. Empty means no category restriction.
    pub categories: FxHashSet<String>,

    /// Minimum price, inclusive.
    pub min_price: Decimal,

    /// Maximum price, inclusive.
    pub max_price: Decimal,

    /// Minimum average rating. `0` means no restriction.
    pub min_rating: Decimal,

    /// Search radius in kilometres around the reference point.
    pub radius_km: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            categories: FxHashSet::default(),
            min_price: Decimal::ZERO,
            max_price: Decimal::from(100_000),
            min_rating: Decimal::ZERO,
            radius_km: 10.0,
        }
    }
}

impl FilterState {
    /// Toggle a category title in the selected set.
    pub fn toggle_category(&mut self, title: &str) {
        if !self.categories.remove(title) {
            self.categories.insert(title.to_string());
        }
    }

    /// Whether a product passes every predicate.
    ///
    /// The radius predicate applies only when a reference point is given (the
    /// map view); the plain list view filters without one. A product with no
    /// location cannot be placed on the map and fails the radius predicate.
    pub fn matches(&self, product: &Product, reference: Option<&ReferencePoint>) -> bool {
        self.matches_category(product)
            && self.matches_price(product)
            && self.matches_rating(product)
            && self.matches_radius(product, reference)
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.categories.is_empty()
            || product
                .categories
                .iter()
                .any(|category| self.categories.contains(&category.title))
    }

    fn matches_price(&self, product: &Product) -> bool {
        self.min_price <= product.price && product.price <= self.max_price
    }

    fn matches_rating(&self, product: &Product) -> bool {
        product.average_rating() >= self.min_rating
    }

    fn matches_radius(&self, product: &Product, reference: Option<&ReferencePoint>) -> bool {
        let Some(reference) = reference else {
            return true;
        };

        product.location.as_ref().is_some_and(|location| {
            geo::distance_km(reference.point(), location.point) <= self.radius_km
        })
    }
}

/// Return the products passing every predicate, in input order.
///
/// Idempotent and side-effect free: the input list is never mutated, and
/// repeated calls with identical inputs return identical results. Complexity
/// is O(products × categories-per-product).
pub fn filter_products<'a>(
    products: &'a [Product],
    filters: &FilterState,
    reference: Option<&ReferencePoint>,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| filters.matches(product, reference))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{
        fixtures,
        geo::{Point, ReferencePoint},
    };

    use super::*;

    fn reference() -> ReferencePoint {
        ReferencePoint::Device(Point::new(28.6139, 77.2090))
    }

    #[test]
    fn empty_category_set_means_no_restriction() {
        let products = fixtures::sample_products();
        let filters = FilterState {
            radius_km: 50.0,
            ..FilterState::default()
        };

        let filtered = filter_products(&products, &filters, Some(&reference()));

        let located = products.iter().filter(|p| p.location.is_some()).count();
        assert_eq!(
            filtered.len(),
            located,
            "every located product passes with no categories selected"
        );
    }

    #[test]
    fn category_predicate_ors_across_product_categories() {
        let products = fixtures::sample_products();
        let mut filters = FilterState {
            radius_km: 50.0,
            ..FilterState::default()
        };
        filters.toggle_category("Furniture");

        let filtered = filter_products(&products, &filters, Some(&reference()));

        assert!(!filtered.is_empty(), "furniture products expected");
        assert!(
            filtered
                .iter()
                .all(|p| p.categories.iter().any(|c| c.title == "Furniture")),
            "every match must carry the selected category"
        );
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let products = fixtures::sample_products();
        let lamp_price = products
            .iter()
            .find(|p| p.name == "Brass Lamp")
            .map(|p| p.price)
            .unwrap_or_default();
        let filters = FilterState {
            min_price: lamp_price,
            max_price: lamp_price,
            radius_km: 50.0,
            ..FilterState::default()
        };

        let filtered = filter_products(&products, &filters, Some(&reference()));

        assert!(
            filtered.iter().any(|p| p.name == "Brass Lamp"),
            "a product priced exactly at both bounds must pass"
        );
    }

    #[test]
    fn rating_predicate_uses_the_average() {
        let products = fixtures::sample_products();
        let filters = FilterState {
            min_rating: Decimal::from(4),
            radius_km: 50.0,
            ..FilterState::default()
        };

        let filtered = filter_products(&products, &filters, Some(&reference()));

        assert!(
            filtered
                .iter()
                .all(|p| p.average_rating() >= Decimal::from(4)),
            "all matches must have average rating >= 4"
        );
    }

    #[test]
    fn radius_excludes_then_includes_the_model_town_product() {
        let products = fixtures::sample_products();
        let narrow = FilterState {
            radius_km: 10.0,
            ..FilterState::default()
        };
        let wide = FilterState {
            radius_km: 15.0,
            ..FilterState::default()
        };

        let near = filter_products(&products, &narrow, Some(&reference()));
        let far = filter_products(&products, &wide, Some(&reference()));

        assert!(
            !near.iter().any(|p| p.name == "Teak Bookshelf"),
            "the ~14.4 km product must be excluded at radius 10"
        );
        assert!(
            far.iter().any(|p| p.name == "Teak Bookshelf"),
            "the ~14.4 km product must be included at radius 15"
        );
    }

    #[test]
    fn products_without_location_fail_the_radius_predicate_on_the_map() {
        let products = fixtures::sample_products();
        let filters = FilterState {
            radius_km: 1_000.0,
            ..FilterState::default()
        };

        let on_map = filter_products(&products, &filters, Some(&reference()));
        let in_list = filter_products(&products, &filters, None);

        assert!(
            !on_map.iter().any(|p| p.location.is_none()),
            "unlocated products cannot appear on the map"
        );
        assert!(
            in_list.iter().any(|p| p.location.is_none()),
            "unlocated products still appear in the plain list"
        );
    }

    #[test]
    fn filtering_is_idempotent_and_does_not_mutate_input() {
        let products = fixtures::sample_products();
        let before = products.clone();
        let filters = FilterState::default();

        let once = filter_products(&products, &filters, Some(&reference()));
        let owned: Vec<_> = once.iter().map(|p| (*p).clone()).collect();
        let twice = filter_products(&owned, &filters, Some(&reference()));

        assert_eq!(products, before, "input list must not be mutated");
        assert_eq!(
            once.len(),
            twice.len(),
            "filtering an already-filtered list changes nothing"
        );
    }

    #[test]
    fn toggle_category_flips_membership() {
        let mut filters = FilterState::default();

        filters.toggle_category("Decor");
        assert!(filters.categories.contains("Decor"));

        filters.toggle_category("Decor");
        assert!(!filters.categories.contains("Decor"));
    }
}
