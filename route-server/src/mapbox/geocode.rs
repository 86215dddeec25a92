//! Place-name geocoding via the Mapbox Geocoding API.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::{Deserialize, Serialize};

use crate::domain::GeoPoint;

use super::client::MapboxClient;
use super::error::MapboxError;

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,

    /// Full place name returned by the geocoder.
    pub place_name: String,

    /// Whether the match carries a US country context.
    pub is_us: bool,
}

impl GeocodeResult {
    /// The resolved coordinates as a point.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Resolves free-form place names to coordinates.
///
/// This abstraction lets the orchestrator and CSV ingestion be tested with
/// mock resolvers.
pub trait Geocoder {
    /// Resolve a place-name query to coordinates and a US-context flag.
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<GeocodeResult, MapboxError>> + Send;
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<FeatureDto>,
}

#[derive(Debug, Deserialize)]
struct FeatureDto {
    #[serde(default)]
    center: Vec<f64>,
    place_name: Option<String>,
    #[serde(default)]
    context: Vec<ContextDto>,
}

#[derive(Debug, Deserialize)]
struct ContextDto {
    #[serde(default)]
    id: String,
    short_code: Option<String>,
}

impl FeatureDto {
    /// A feature is US when any context entry is a country with short
    /// code `us`.
    fn is_us(&self) -> bool {
        self.context.iter().any(|entry| {
            entry.id.starts_with("country") && entry.short_code.as_deref() == Some("us")
        })
    }
}

/// Geocoding client for the Mapbox Geocoding v5 API.
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    client: MapboxClient,
}

impl MapboxGeocoder {
    /// Create a new geocoder over a shared Mapbox client.
    pub fn new(client: MapboxClient) -> Self {
        Self { client }
    }
}

impl Geocoder for MapboxGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeocodeResult, MapboxError> {
        let config = self.client.config();
        let url = format!(
            "{}/{}.json?access_token={}&limit=1&country=us&autocomplete=false",
            config.geocoding_url,
            urlencoding::encode(query),
            config.access_token,
        );

        let response: GeocodingResponse = self.client.fetch_json(&url).await?;

        let Some(feature) = response.features.into_iter().next() else {
            return Err(MapboxError::NoMatch {
                query: query.to_string(),
            });
        };

        if feature.center.len() != 2 {
            return Err(MapboxError::InvalidGeocode);
        }

        Ok(GeocodeResult {
            latitude: feature.center[1],
            longitude: feature.center[0],
            place_name: feature.place_name.clone().unwrap_or_else(|| query.to_string()),
            is_us: feature.is_us(),
        })
    }
}

/// Default TTL for cached geocode results: 7 days.
const DEFAULT_GEOCODE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default maximum number of cached geocode entries.
const DEFAULT_GEOCODE_CAPACITY: u64 = 10_000;

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    pub ttl: Duration,
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_GEOCODE_TTL,
            max_capacity: DEFAULT_GEOCODE_CAPACITY,
        }
    }
}

/// Geocoder with a normalized-query result cache.
///
/// Queries are trimmed and lowercased before lookup, so `" Chicago "` and
/// `"chicago"` share one entry.
#[derive(Debug)]
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<String, GeocodeResult>,
}

impl<G> CachedGeocoder<G> {
    /// Wrap a geocoder with a result cache.
    pub fn new(inner: G, config: &GeocodeCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl<G: Geocoder + Sync> Geocoder for CachedGeocoder<G> {
    async fn geocode(&self, query: &str) -> Result<GeocodeResult, MapboxError> {
        let key = query.trim().to_lowercase();

        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let result = self.inner.geocode(query).await?;
        self.cache.insert(key, result.clone()).await;

        Ok(result)
    }
}
