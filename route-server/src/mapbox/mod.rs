//! Mapbox API clients.
//!
//! Thin async wrappers over the Geocoding and Directions v5 APIs.
//! Provider responses are converted to domain types and all failures are
//! normalized into [`MapboxError`] at this boundary.

mod client;
mod directions;
mod error;
mod geocode;

pub use client::{DEFAULT_DIRECTIONS_URL, DEFAULT_GEOCODING_URL, MapboxClient, MapboxConfig};
pub use directions::{DirectionsProvider, MapboxDirections, RouteResult};
pub use error::MapboxError;
pub use geocode::{
    CachedGeocoder, GeocodeCacheConfig, GeocodeResult, Geocoder, MapboxGeocoder,
};
