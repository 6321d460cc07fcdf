//! Deterministic sample data around the Delhi viewport.
//!
//! The catalog pairs a cluster of products near Connaught Place with one in
//! Model Town, ~14.4 km away, so radius tests can sit either side of the
//! default 10 km search radius. Used across unit and integration tests.

use rust_decimal::Decimal;
use smallvec::smallvec;

use crate::{
    catalog::{Category, Location, Owner, Product, Rating, Stock},
    geo::Point,
    orders::{Order, OrderLine, OrderStatus, sellers::SellerIdentity},
};

/// The sample categories.
pub fn sample_categories() -> Vec<Category> {
    vec![
        category("c-furniture", "Furniture"),
        category("c-decor", "Decor"),
        category("c-lighting", "Lighting"),
    ]
}

/// The sample catalog.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "p-lamp".to_string(),
            name: "Brass Lamp".to_string(),
            price: Decimal::from(1200),
            stock: Stock::Unlimited,
            categories: vec![category("c-lighting", "Lighting"), category("c-decor", "Decor")],
            ratings: vec![rating("asha", 5), rating("ravi", 4)],
            location: Some(Location {
                point: Point::new(28.6315, 77.2167),
                address: Some("Connaught Place, New Delhi".to_string()),
                radius_km: None,
            }),
            owner: Some(seller_one_owner()),
            slug: Some("brass-lamp".to_string()),
            image_url: None,
        },
        Product {
            id: "p-shelf".to_string(),
            name: "Teak Bookshelf".to_string(),
            price: Decimal::from(5400),
            stock: Stock::Limited(2),
            categories: vec![category("c-furniture", "Furniture")],
            ratings: vec![rating("asha", 4)],
            location: Some(Location {
                point: Point::new(28.7041, 77.1025),
                address: Some("Model Town, Delhi".to_string()),
                radius_km: None,
            }),
            owner: Some(Owner {
                id: Some("user_dev".to_string()),
                email: Some("dev@example.com".to_string()),
            }),
            slug: Some("teak-bookshelf".to_string()),
            image_url: None,
        },
        Product {
            id: "p-rug".to_string(),
            name: "Jute Rug".to_string(),
            price: Decimal::from(900),
            stock: Stock::Unlimited,
            categories: vec![category("c-decor", "Decor"), category("c-furniture", "Furniture")],
            ratings: vec![rating("ravi", 3)],
            location: Some(Location {
                point: Point::new(28.6200, 77.2150),
                address: None,
                radius_km: None,
            }),
            owner: Some(seller_one_owner()),
            slug: Some("jute-rug".to_string()),
            image_url: None,
        },
        Product {
            id: "p-tea".to_string(),
            name: "Clay Tea Set".to_string(),
            price: Decimal::from(450),
            stock: Stock::Limited(3),
            categories: vec![],
            ratings: vec![],
            location: None,
            owner: None,
            slug: Some("clay-tea-set".to_string()),
            image_url: None,
        },
    ]
}

/// One sample product by id. Unknown ids yield a minimal stand-in so tests
/// never panic inside fixture lookup.
pub fn product(id: &str) -> Product {
    sample_products()
        .into_iter()
        .find(|product| product.id == id)
        .unwrap_or_else(|| Product {
            id: id.to_string(),
            name: format!("Stand-in {id}"),
            price: Decimal::from(100),
            stock: Stock::Unlimited,
            categories: vec![],
            ratings: vec![],
            location: None,
            owner: None,
            slug: None,
            image_url: None,
        })
}

/// The sample orders: one mixing two sellers' products, one belonging to a
/// single seller.
pub fn sample_orders() -> Vec<Order> {
    vec![
        Order {
            id: "order-1001".to_string(),
            order_number: "ORD-1001".to_string(),
            buyer_name: "Asha".to_string(),
            buyer_email: "asha@example.com".to_string(),
            clerk_user_id: Some("user_asha".to_string()),
            lines: smallvec![
                OrderLine {
                    product_id: "p-lamp".to_string(),
                    name: "Brass Lamp".to_string(),
                    price: Decimal::from(1200),
                    quantity: 2,
                },
                OrderLine {
                    product_id: "p-shelf".to_string(),
                    name: "Teak Bookshelf".to_string(),
                    price: Decimal::from(5400),
                    quantity: 1,
                },
            ],
            total_price: Decimal::from(7800),
            amount_discount: Decimal::ZERO,
            status: OrderStatus::Paid,
            created_at: "2026-01-05T10:30:00Z".to_string(),
        },
        Order {
            id: "order-1002".to_string(),
            order_number: "ORD-1002".to_string(),
            buyer_name: "Ravi".to_string(),
            buyer_email: "ravi@example.com".to_string(),
            clerk_user_id: Some("user_ravi".to_string()),
            lines: smallvec![OrderLine {
                product_id: "p-shelf".to_string(),
                name: "Teak Bookshelf".to_string(),
                price: Decimal::from(5400),
                quantity: 2,
            }],
            total_price: Decimal::from(10_800),
            amount_discount: Decimal::ZERO,
            status: OrderStatus::Pending,
            created_at: "2026-01-06T18:00:00Z".to_string(),
        },
    ]
}

/// The seller owning the lamp and the rug.
pub fn seller_one() -> SellerIdentity {
    SellerIdentity {
        id: Some("user_mira".to_string()),
        email: Some("mira@example.com".to_string()),
    }
}

fn seller_one_owner() -> Owner {
    Owner {
        id: Some("user_mira".to_string()),
        email: Some("mira@example.com".to_string()),
    }
}

fn category(id: &str, title: &str) -> Category {
    Category {
        id: id.to_string(),
        title: title.to_string(),
    }
}

fn rating(username: &str, score: u8) -> Rating {
    Rating {
        username: username.to_string(),
        score,
        comment: String::new(),
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}
