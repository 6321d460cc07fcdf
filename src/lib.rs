//! Bazaar
//!
//! Bazaar is the core engine for a geo-located marketplace storefront: catalog
//! projections, proximity filtering, basket aggregation, seller order views and
//! the payment/webhook boundary, kept free of any UI or transport concern.

pub mod basket;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod content;
pub mod filters;
pub mod fixtures;
pub mod geo;
pub mod maps;
pub mod orders;
pub mod prelude;
pub mod webhook;
