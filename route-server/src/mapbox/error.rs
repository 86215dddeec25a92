//! Mapbox client error types.

use crate::geo::PolylineError;

/// Errors from the Mapbox geocoding and directions clients.
///
/// Transport, parse and provider-shape failures are all normalized here at
/// the client boundary so the planner core never sees transport-specific
/// error types.
#[derive(Debug, thiserror::Error)]
pub enum MapboxError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL failed scheme validation before dispatch.
    #[error("invalid URL scheme: only http and https are allowed")]
    InvalidScheme,

    /// API returned an error status code.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Geocoder returned zero matches for the query.
    #[error("no geocoding result found for {query:?}")]
    NoMatch { query: String },

    /// Geocoder match did not carry exactly two center coordinates.
    #[error("invalid geocoding response")]
    InvalidGeocode,

    /// Directions provider returned no routes between the endpoints.
    #[error("no route found")]
    NoRoute,

    /// Directions route was missing its geometry.
    #[error("route geometry missing")]
    MissingGeometry,

    /// Route geometry failed to decode.
    #[error(transparent)]
    Polyline(#[from] PolylineError),
}
