//! Driving routes via the Mapbox Directions API.

use serde::Deserialize;

use crate::domain::GeoPoint;
use crate::geo::decode_polyline6;

use super::client::MapboxClient;
use super::error::MapboxError;

/// Meters per statute mile.
const METERS_PER_MILE: f64 = 1609.344;

/// Geometry encoding requested from the provider.
const GEOMETRY_FORMAT: &str = "polyline6";

/// A driving route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Driving distance in miles.
    pub distance_miles: f64,

    /// Driving duration in seconds.
    pub duration_seconds: f64,

    /// Raw encoded geometry as returned by the provider.
    pub geometry: String,

    /// Encoding of `geometry`.
    pub geometry_format: String,

    /// Decoded route points in driving order.
    pub coordinates: Vec<GeoPoint>,
}

/// Fetches driving routes between two coordinates.
pub trait DirectionsProvider {
    /// Fetch the best driving route from `start` to `end`.
    fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Future<Output = Result<RouteResult, MapboxError>> + Send;
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
struct RouteDto {
    /// Distance in meters.
    #[serde(default)]
    distance: f64,

    /// Duration in seconds.
    #[serde(default)]
    duration: f64,

    geometry: Option<String>,
}

/// Directions client for the Mapbox Directions v5 driving profile.
#[derive(Debug, Clone)]
pub struct MapboxDirections {
    client: MapboxClient,
}

impl MapboxDirections {
    /// Create a new directions client over a shared Mapbox client.
    pub fn new(client: MapboxClient) -> Self {
        Self { client }
    }
}

impl DirectionsProvider for MapboxDirections {
    async fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult, MapboxError> {
        let config = self.client.config();
        // Mapbox takes lon,lat pairs.
        let url = format!(
            "{}/{},{};{},{}?geometries={}&overview=full&access_token={}",
            config.directions_url,
            start.longitude,
            start.latitude,
            end.longitude,
            end.latitude,
            GEOMETRY_FORMAT,
            config.access_token,
        );

        let response: DirectionsResponse = self.client.fetch_json(&url).await?;

        let Some(route) = response.routes.into_iter().next() else {
            return Err(MapboxError::NoRoute);
        };

        let Some(geometry) = route.geometry else {
            return Err(MapboxError::MissingGeometry);
        };

        let coordinates = decode_polyline6(&geometry)?;

        Ok(RouteResult {
            distance_miles: route.distance / METERS_PER_MILE,
            duration_seconds: route.duration,
            geometry,
            geometry_format: GEOMETRY_FORMAT.to_string(),
            coordinates,
        })
    }
}
