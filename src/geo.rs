//! Geographic points and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fallback map centre (New Delhi) used when no position source is available.
///
/// Callers opt into this explicitly; a failed geolocation fix is never
/// silently replaced by it.
pub const DEFAULT_CENTER: Point = Point {
    latitude: 28.6139,
    longitude: 77.2090,
};

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in degrees, north positive.
    pub latitude: f64,

    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

impl Point {
    /// Create a point from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Point {
            latitude,
            longitude,
        }
    }
}

/// The coordinate product distances are measured against.
///
/// Exactly one source is active at a time: a device GPS fix or a marker the
/// user placed on the map. Switching source replaces the whole value, so a
/// late-arriving fix overwrites whatever is current (last write wins).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReferencePoint {
    /// Position reported by the device.
    Device(Point),

    /// Marker placed on the map by the user.
    Pinned(Point),
}

impl ReferencePoint {
    /// The active coordinate.
    pub fn point(&self) -> Point {
        match self {
            ReferencePoint::Device(point) | ReferencePoint::Pinned(point) => *point,
        }
    }
}

/// Great-circle distance between two points in kilometres, via the haversine
/// formula.
///
/// Pure and deterministic. Identical points return exactly `0.0`; the
/// central-angle operand is clamped into `[0, 1]` so antipodal points cannot
/// produce NaN from floating-point drift.
pub fn distance_km(a: Point, b: Point) -> f64 {
    if a == b {
        return 0.0;
    }

    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}
