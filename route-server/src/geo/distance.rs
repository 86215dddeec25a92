//! Great-circle distance and bounding boxes.

use crate::domain::GeoPoint;

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.7613;

/// Approximate miles per degree of latitude.
const MILES_PER_DEG_LAT: f64 = 69.0;

/// Great-circle distance between two points in miles (haversine formula).
///
/// Symmetric, and exactly zero for identical points.
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Whether the point lies inside the box (inclusive).
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }
}

/// Bounding box of a point set, expanded by `buffer_miles` on every side.
///
/// The longitude buffer scales with the cosine of the mid latitude,
/// clamped at 0.01 so the conversion stays bounded near the poles.
/// Returns `None` for an empty point set.
pub fn bounding_box(points: &[GeoPoint], buffer_miles: f64) -> Option<BoundingBox> {
    let first = points.first()?;

    let mut min_lat = first.latitude;
    let mut max_lat = first.latitude;
    let mut min_lon = first.longitude;
    let mut max_lon = first.longitude;

    for point in &points[1..] {
        min_lat = min_lat.min(point.latitude);
        max_lat = max_lat.max(point.latitude);
        min_lon = min_lon.min(point.longitude);
        max_lon = max_lon.max(point.longitude);
    }

    let lat_buffer = buffer_miles / MILES_PER_DEG_LAT;
    let mid_lat = (min_lat + max_lat) / 2.0;
    let lon_buffer =
        buffer_miles / (MILES_PER_DEG_LAT * mid_lat.to_radians().cos().max(0.01));

    Some(BoundingBox {
        min_lat: min_lat - lat_buffer,
        max_lat: max_lat + lat_buffer,
        min_lon: min_lon - lon_buffer,
        max_lon: max_lon + lon_buffer,
    })
}
