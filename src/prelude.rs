//! Bazaar prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, BasketLine, Removal, persist::PersistError},
    catalog::{Category, Location, Owner, Product, Rating, Stock},
    checkout::{
        CheckoutError, CheckoutProvider, CheckoutUrl, LineItem, Metadata, RedirectUrls,
        build_line_items,
    },
    config::{ConfigError, StorefrontConfig, WebhookConfig},
    content::{
        ContentQuery, MemoryContent, MutationError, NewOrder, NewOrderLine, OrderMutations,
        OrderSink, RemovalOutcome, TransportError,
    },
    filters::{FilterState, filter_products},
    geo::{DEFAULT_CENTER, EARTH_RADIUS_KM, Point, ReferencePoint, distance_km},
    maps::{GeolocationError, Geolocator, RouteError, RoutePath, Router},
    orders::{
        Order, OrderLine, OrderStatus,
        removal::{RemovalError, RemovalFlow, RemovalState},
        sellers::{SellerIdentity, SellerOrderView, resolve_for_seller},
    },
    webhook::{Acknowledgement, WebhookError},
};
