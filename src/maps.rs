//! Geolocation and routing contracts.
//!
//! Both services live outside this crate; the contracts here turn their
//! callback-style APIs into plain result-returning calls with typed failure
//! reasons. Neither call is retried implicitly, and a failed geolocation fix
//! is never silently replaced by a default. Late responses are harmless by
//! design: reference-point assignment is last-write-wins.

use thiserror::Error;

use crate::geo::Point;

/// Why a position fix could not be obtained. Each variant carries its own
/// user-facing message; the UI never collapses them into a generic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user declined the location permission prompt.
    #[error("location permission was denied")]
    PermissionDenied,

    /// The device could not determine a position.
    #[error("current location is unavailable")]
    Unavailable,

    /// No fix arrived within the allotted time.
    #[error("timed out waiting for a location fix")]
    Timeout,
}

/// Device position source.
pub trait Geolocator {
    /// The device's current position.
    ///
    /// # Errors
    ///
    /// Returns a [`GeolocationError`] naming the specific failure. Callers
    /// may then explicitly fall back to [`crate::geo::DEFAULT_CENTER`].
    fn current_position(&self) -> Result<Point, GeolocationError>;
}

/// A computed driving route.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    /// Polyline of the route.
    pub points: Vec<Point>,

    /// Total length in kilometres.
    pub distance_km: f64,

    /// Estimated duration in minutes.
    pub duration_minutes: f64,
}

/// Why a route could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The service found no route between the endpoints. The UI shows
    /// "no route found" rather than a blank map.
    #[error("no route found")]
    NoRouteFound,

    /// The routing service failed.
    #[error("route lookup failed: {0}")]
    Service(String),
}

/// Turn-by-turn routing source.
pub trait Router {
    /// Compute a route from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`]; no retry is automatic.
    fn compute_route(&self, origin: Point, destination: Point) -> Result<RoutePath, RouteError>;
}
