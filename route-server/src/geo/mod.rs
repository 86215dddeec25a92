//! Geospatial math: distances, polyline decoding, route simplification.
//!
//! Pure functions with no I/O; everything operates on [`GeoPoint`]
//! sequences decoded from provider geometry.
//!
//! [`GeoPoint`]: crate::domain::GeoPoint

mod distance;
mod polyline;
mod simplify;

pub use distance::{BoundingBox, EARTH_RADIUS_MILES, bounding_box, haversine_miles};
pub use polyline::{PRECISION_POLYLINE6, PolylineError, decode_polyline, decode_polyline6};
pub use simplify::{DEFAULT_MIN_MILES, MileMarker, build_mile_markers, simplify_route};
