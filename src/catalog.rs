//! Catalog projections of content-backend documents.
//!
//! Products, categories and ratings arrive from the content backend as
//! loosely-shaped records with optional fields. This module is the one place
//! where those records are validated and given their defaults: a missing
//! ratings list becomes an empty list, a missing stock count means unlimited
//! stock, and records without an identity, a name, or with a negative price
//! are dropped before they can reach any view. Everything downstream works
//! with the fully-formed [`Product`] and [`Category`] types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Point;

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend document id.
    pub id: String,

    /// Display title, the value category filters match against.
    pub title: String,
}

/// A single customer rating on a product.
///
/// The ratings collection is append-only from the product's perspective;
/// entries are never edited or removed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Contributing username.
    pub username: String,

    /// Integer score, 1 to 5 inclusive.
    pub score: u8,

    /// Free-text comment.
    pub comment: String,

    /// Creation timestamp as reported by the backend (ISO 8601).
    pub created_at: String,
}

/// Where a product sits on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Coordinate of the product.
    pub point: Point,

    /// Optional human-readable address.
    pub address: Option<String>,

    /// Optional seller-declared service radius in kilometres.
    pub radius_km: Option<f64>,
}

/// Seller identity attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Auth-provider user id.
    pub id: Option<String>,

    /// Seller email.
    pub email: Option<String>,
}

/// Stock level of a product. A missing stock field on the wire means the
/// product is not stock-tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stock {
    /// Finite number of units available.
    Limited(u32),

    /// Not stock-tracked; always purchasable.
    Unlimited,
}

impl Stock {
    /// Whether at least one unit can be purchased.
    pub fn available(&self) -> bool {
        match self {
            Stock::Limited(count) => *count > 0,
            Stock::Unlimited => true,
        }
    }
}

/// A fully-validated catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend document id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price. Non-negative, currency-agnostic.
    pub price: Decimal,

    /// Stock level.
    pub stock: Stock,

    /// Categories the product belongs to. May be empty.
    pub categories: Vec<Category>,

    /// Customer ratings. May be empty.
    pub ratings: Vec<Rating>,

    /// Map location, when the seller provided one.
    pub location: Option<Location>,

    /// Seller identity, when known.
    pub owner: Option<Owner>,

    /// URL slug for the product page.
    pub slug: Option<String>,

    /// Primary image URL.
    pub image_url: Option<String>,
}

impl Product {
    /// Arithmetic mean of rating scores, `0` when no ratings exist.
    pub fn average_rating(&self) -> Decimal {
        if self.ratings.is_empty() {
            return Decimal::ZERO;
        }

        let sum: u32 = self.ratings.iter().map(|r| u32::from(r.score)).sum();

        Decimal::from(sum) / Decimal::from(self.ratings.len())
    }
}

/// A product record as it arrives from the content backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    /// Backend document id.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Unit price.
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Stock count; absent means unlimited.
    #[serde(default)]
    pub stock: Option<u32>,

    /// Category references.
    #[serde(default)]
    pub categories: Option<Vec<RawCategory>>,

    /// Rating entries.
    #[serde(default)]
    pub ratings: Option<Vec<RawRating>>,

    /// Map location.
    #[serde(default)]
    pub location: Option<RawLocation>,

    /// Seller identity.
    #[serde(default)]
    pub owner: Option<Owner>,

    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,

    /// Primary image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A category record as it arrives from the content backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategory {
    /// Backend document id.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
}

/// A rating entry as it arrives from the content backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRating {
    /// Contributing username.
    #[serde(default)]
    pub username: Option<String>,

    /// Integer score.
    #[serde(default)]
    pub score: Option<i64>,

    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,

    /// Creation timestamp.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// A location record as it arrives from the content backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    /// Latitude in degrees.
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude in degrees.
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Human-readable address.
    #[serde(default)]
    pub address: Option<String>,

    /// Seller-declared service radius in kilometres.
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// Validate raw product records, applying defaults and dropping records that
/// cannot be rendered.
///
/// A record is dropped when it has no id, no name, or a negative price. One
/// malformed record never poisons the rest of the list. Missing optional
/// collections default to empty; a missing stock count means unlimited stock;
/// ratings with a score outside 1 to 5 are discarded.
pub fn decode_products(raw: Vec<RawProduct>) -> Vec<Product> {
    raw.into_iter().filter_map(decode_product).collect()
}

/// Validate raw category records, dropping those with no id or no title.
pub fn decode_categories(raw: Vec<RawCategory>) -> Vec<Category> {
    raw.into_iter().filter_map(decode_category).collect()
}

fn decode_product(raw: RawProduct) -> Option<Product> {
    let id = raw.id.filter(|id| !id.is_empty())?;
    let name = raw.name.filter(|name| !name.is_empty())?;

    let price = raw.price.unwrap_or(Decimal::ZERO);
    if price < Decimal::ZERO {
        return None;
    }

    let stock = raw.stock.map_or(Stock::Unlimited, Stock::Limited);

    let categories = raw
        .categories
        .unwrap_or_default()
        .into_iter()
        .filter_map(decode_category)
        .collect();

    let ratings = raw
        .ratings
        .unwrap_or_default()
        .into_iter()
        .filter_map(decode_rating)
        .collect();

    let location = raw.location.and_then(decode_location);

    Some(Product {
        id,
        name,
        price,
        stock,
        categories,
        ratings,
        location,
        owner: raw.owner,
        slug: raw.slug,
        image_url: raw.image_url,
    })
}

fn decode_category(raw: RawCategory) -> Option<Category> {
    let id = raw.id.filter(|id| !id.is_empty())?;
    let title = raw.title.filter(|title| !title.is_empty())?;

    Some(Category { id, title })
}

fn decode_rating(raw: RawRating) -> Option<Rating> {
    let score = match raw.score {
        Some(score @ 1..=5) => u8::try_from(score).ok()?,
        _ => return None,
    };

    Some(Rating {
        username: raw.username.unwrap_or_default(),
        score,
        comment: raw.comment.unwrap_or_default(),
        created_at: raw.created_at.unwrap_or_default(),
    })
}

fn decode_location(raw: RawLocation) -> Option<Location> {
    let latitude = raw.latitude?;
    let longitude = raw.longitude?;

    Some(Location {
        point: Point::new(latitude, longitude),
        address: raw.address,
        radius_km: raw.radius_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_named(id: &str, name: &str) -> RawProduct {
        RawProduct {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            price: Some(Decimal::from(100)),
            ..RawProduct::default()
        }
    }

    #[test]
    fn average_rating_is_zero_without_ratings() {
        let products = decode_products(vec![raw_named("p1", "Lamp")]);

        assert_eq!(
            products.first().map(Product::average_rating),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn average_rating_is_the_mean_of_scores() {
        let mut raw = raw_named("p1", "Lamp");
        raw.ratings = Some(vec![
            RawRating {
                score: Some(4),
                ..RawRating::default()
            },
            RawRating {
                score: Some(5),
                ..RawRating::default()
            },
        ]);

        let products = decode_products(vec![raw]);
        let avg = products.first().map(Product::average_rating);

        assert_eq!(avg, Some(Decimal::new(45, 1)), "mean of 4 and 5 is 4.5");
    }

    #[test]
    fn records_without_id_or_name_are_dropped() {
        let no_id = RawProduct {
            name: Some("Ghost".to_string()),
            ..RawProduct::default()
        };
        let no_name = RawProduct {
            id: Some("p2".to_string()),
            ..RawProduct::default()
        };

        assert!(decode_products(vec![no_id, no_name]).is_empty());
    }

    #[test]
    fn negative_price_is_dropped_missing_price_defaults_to_zero() {
        let mut negative = raw_named("p1", "Broken");
        negative.price = Some(Decimal::from(-5));
        let mut missing = raw_named("p2", "Free");
        missing.price = None;

        let products = decode_products(vec![negative, missing]);

        assert_eq!(products.len(), 1, "negative price must be dropped");
        assert_eq!(
            products.first().map(|p| p.price),
            Some(Decimal::ZERO),
            "missing price defaults to zero"
        );
    }

    #[test]
    fn missing_stock_means_unlimited() {
        let tracked = RawProduct {
            stock: Some(0),
            ..raw_named("p1", "Scarce")
        };
        let untracked = raw_named("p2", "Plentiful");

        let products = decode_products(vec![tracked, untracked]);
        let stocks: Vec<Stock> = products.iter().map(|p| p.stock).collect();

        assert_eq!(stocks, vec![Stock::Limited(0), Stock::Unlimited]);
        assert!(!Stock::Limited(0).available());
        assert!(Stock::Unlimited.available());
    }

    #[test]
    fn out_of_range_rating_scores_are_discarded() {
        let mut raw = raw_named("p1", "Lamp");
        raw.ratings = Some(vec![
            RawRating {
                score: Some(0),
                ..RawRating::default()
            },
            RawRating {
                score: Some(6),
                ..RawRating::default()
            },
            RawRating {
                score: Some(3),
                ..RawRating::default()
            },
        ]);

        let products = decode_products(vec![raw]);

        assert_eq!(products.first().map(|p| p.ratings.len()), Some(1));
    }

    #[test]
    fn location_requires_both_coordinates() {
        let mut half = raw_named("p1", "Nowhere");
        half.location = Some(RawLocation {
            latitude: Some(28.6),
            ..RawLocation::default()
        });

        let products = decode_products(vec![half]);

        assert_eq!(products.first().and_then(|p| p.location.clone()), None);
    }

    #[test]
    fn one_malformed_record_does_not_poison_the_list() {
        let good = raw_named("p1", "Kept");
        let bad = RawProduct::default();

        let products = decode_products(vec![bad, good]);

        assert_eq!(products.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["p1"]);
    }

    #[test]
    fn categories_without_title_are_dropped() {
        let raw = vec![
            RawCategory {
                id: Some("c1".to_string()),
                title: Some("Furniture".to_string()),
            },
            RawCategory {
                id: Some("c2".to_string()),
                title: None,
            },
        ];

        let categories = decode_categories(raw);

        assert_eq!(
            categories.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
            vec!["Furniture"]
        );
    }
}
