//! Route plan orchestration.
//!
//! Composes geocoding, directions, corridor search and the fuel-stop
//! planner into one idempotent `compute_plan` operation. Completed plans
//! are cached for an hour under a content-addressed key; failures are
//! never cached.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::cache::PlanCache;
use crate::domain::{EndpointSummary, FuelingSummary, RoutePlan, RouteSummary};
use crate::mapbox::{DirectionsProvider, Geocoder, MapboxError};
use crate::planner::{PlannerError, choose_start_price, plan_fuel_stops, round_to};
use crate::stations::{CatalogError, StationCatalog, StationProvider, find_stations_on_route};

/// Cache key prefix for computed plans.
const PLAN_KEY_PREFIX: &str = "route_plan";

fn default_max_range_miles() -> u32 {
    500
}

fn default_mpg() -> f64 {
    10.0
}

fn default_max_station_distance_miles() -> f64 {
    10.0
}

/// A request to compute a fuel-optimized route plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Free-form start location, e.g. "Springfield, IL".
    pub start_location: String,

    /// Free-form end location.
    pub end_location: String,

    /// Vehicle range on a full tank, miles. Minimum 1.
    #[serde(default = "default_max_range_miles")]
    pub max_range_miles: u32,

    /// Fuel economy in miles per gallon. Minimum 0.1.
    #[serde(default = "default_mpg")]
    pub mpg: f64,

    /// Corridor width: maximum distance from the route for a station to
    /// count, miles. Minimum 0.1.
    #[serde(default = "default_max_station_distance_miles")]
    pub max_station_distance_miles: f64,
}

impl PlanRequest {
    /// Check shape and bounds before any computation.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.start_location.trim().is_empty() {
            return Err(PlanError::Validation(
                "start_location must not be empty".to_string(),
            ));
        }
        if self.end_location.trim().is_empty() {
            return Err(PlanError::Validation(
                "end_location must not be empty".to_string(),
            ));
        }
        if self.max_range_miles < 1 {
            return Err(PlanError::Validation(
                "max_range_miles must be at least 1".to_string(),
            ));
        }
        if self.mpg < 0.1 {
            return Err(PlanError::Validation("mpg must be at least 0.1".to_string()));
        }
        if self.max_station_distance_miles < 0.1 {
            return Err(PlanError::Validation(
                "max_station_distance_miles must be at least 0.1".to_string(),
            ));
        }
        Ok(())
    }

    /// Deterministic content-addressed cache key for this request.
    ///
    /// The payload is serialized with sorted keys so that equal requests
    /// always hash identically, then digested with SHA-256.
    pub fn cache_key(&self) -> String {
        let mut payload = BTreeMap::new();
        payload.insert("start", serde_json::json!(self.start_location));
        payload.insert("end", serde_json::json!(self.end_location));
        payload.insert("max_range_miles", serde_json::json!(self.max_range_miles));
        payload.insert("mpg", serde_json::json!(self.mpg));
        payload.insert(
            "max_station_distance_miles",
            serde_json::json!(self.max_station_distance_miles),
        );

        let bytes = serde_json::to_vec(&payload).expect("plan request payload serializes");
        let digest = Sha256::digest(&bytes);
        format!("{PLAN_KEY_PREFIX}:{digest:x}")
    }
}

/// Errors from route plan computation.
///
/// All variants are expected, recoverable-by-caller domain errors; the
/// orchestrator never retries and never caches a failure.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Malformed request shape or bounds.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A resolved endpoint lies outside the supported country.
    #[error("start and end locations must be within the USA")]
    UnsupportedRegion,

    /// Geocoding or directions failure.
    #[error(transparent)]
    Mapbox(#[from] MapboxError),

    /// Station catalog failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Start-price selection or fuel-stop planning failure.
    #[error(transparent)]
    Planner(#[from] PlannerError),
}

/// The plan orchestrator.
///
/// Holds the provider clients, the station catalog and the plan cache.
/// Construct once at process start and share; each request is an
/// independent pipeline with no shared mutable state beyond the caches.
pub struct RoutePlanner<G, D, P> {
    geocoder: G,
    directions: D,
    catalog: StationCatalog<P>,
    plans: PlanCache,
}

impl<G, D, P> RoutePlanner<G, D, P>
where
    G: Geocoder + Sync,
    D: DirectionsProvider + Sync,
    P: StationProvider + Sync,
{
    /// Create a new planner from its collaborators.
    pub fn new(geocoder: G, directions: D, catalog: StationCatalog<P>, plans: PlanCache) -> Self {
        Self {
            geocoder,
            directions,
            catalog,
            plans,
        }
    }

    /// The station catalog, for snapshot invalidation after ingestion.
    pub fn catalog(&self) -> &StationCatalog<P> {
        &self.catalog
    }

    /// The geocoder shared with CSV ingestion.
    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Compute a route plan, or return the cached plan for an identical
    /// request within the TTL window.
    pub async fn compute_plan(&self, request: &PlanRequest) -> Result<Arc<RoutePlan>, PlanError> {
        request.validate()?;

        let key = request.cache_key();
        if let Some(plan) = self.plans.get(&key).await {
            debug!(%key, "plan cache hit");
            return Ok(plan);
        }

        let start_geo = self.geocoder.geocode(&request.start_location).await?;
        let end_geo = self.geocoder.geocode(&request.end_location).await?;
        if !start_geo.is_us || !end_geo.is_us {
            return Err(PlanError::UnsupportedRegion);
        }

        let route = self
            .directions
            .route(start_geo.point(), end_geo.point())
            .await?;
        debug!(
            distance_miles = route.distance_miles,
            points = route.coordinates.len(),
            "fetched route"
        );

        let stations = self.catalog.stations().await?;
        let on_route = find_stations_on_route(
            &route.coordinates,
            &stations,
            request.max_station_distance_miles,
        );
        debug!(candidates = on_route.len(), "corridor search complete");

        let start = choose_start_price(&on_route, request.max_station_distance_miles)?;
        let planned = plan_fuel_stops(
            &on_route,
            route.distance_miles,
            request.mpg,
            f64::from(request.max_range_miles),
            start,
        )?;

        let plan = Arc::new(RoutePlan {
            start: EndpointSummary {
                query: request.start_location.clone(),
                place_name: start_geo.place_name,
                latitude: start_geo.latitude,
                longitude: start_geo.longitude,
            },
            end: EndpointSummary {
                query: request.end_location.clone(),
                place_name: end_geo.place_name,
                latitude: end_geo.latitude,
                longitude: end_geo.longitude,
            },
            route: RouteSummary {
                distance_miles: round_to(route.distance_miles, 2),
                duration_seconds: round_to(route.duration_seconds, 1),
                geometry: route.geometry,
                geometry_format: route.geometry_format,
            },
            fueling: FuelingSummary {
                max_range_miles: request.max_range_miles,
                mpg: request.mpg,
                total_cost: planned.total_cost,
                total_gallons: planned.total_gallons,
                fuel_stops: planned.stops,
            },
            assumptions: vec![
                "Fuel price at the start uses the nearest station along the route.".to_string(),
                "Fuel stops are optimized for cost under the configured range constraint."
                    .to_string(),
            ],
        });

        self.plans.insert(key, Arc::clone(&plan)).await;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cache::PlanCacheConfig;
    use crate::domain::{FuelStation, GeoPoint};
    use crate::mapbox::{GeocodeResult, RouteResult};
    use crate::stations::CatalogConfig;

    struct FakeGeocoder {
        calls: AtomicUsize,
        us: bool,
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<GeocodeResult, MapboxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Start queries resolve to the south end, everything else to
            // the north end of the test route.
            let latitude = if query.contains("Start") { 39.0 } else { 40.0 };
            Ok(GeocodeResult {
                latitude,
                longitude: -89.0,
                place_name: format!("{query}, United States"),
                is_us: self.us,
            })
        }
    }

    struct FakeDirections {
        calls: AtomicUsize,
    }

    impl DirectionsProvider for FakeDirections {
        async fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult, MapboxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Straight line between the endpoints, ~69 miles.
            let coordinates: Vec<GeoPoint> = (0..=20)
                .map(|i| {
                    let t = i as f64 / 20.0;
                    GeoPoint::new(
                        start.latitude + t * (end.latitude - start.latitude),
                        start.longitude + t * (end.longitude - start.longitude),
                    )
                })
                .collect();
            Ok(RouteResult {
                distance_miles: 69.1,
                duration_seconds: 4480.0,
                geometry: "stub-geometry".to_string(),
                geometry_format: "polyline6".to_string(),
                coordinates,
            })
        }
    }

    struct FakeStations;

    impl StationProvider for FakeStations {
        async fn fetch_geocoded(&self) -> Result<Vec<FuelStation>, CatalogError> {
            Ok(vec![
                FuelStation {
                    id: 1,
                    opis_id: 1001,
                    truckstop_name: "South Stop".to_string(),
                    address: "1 Main St".to_string(),
                    city: "Springfield".to_string(),
                    state: "IL".to_string(),
                    rack_id: 7,
                    retail_price: 3.5,
                    latitude: Some(39.01),
                    longitude: Some(-89.0),
                },
                FuelStation {
                    id: 2,
                    opis_id: 1002,
                    truckstop_name: "Mid Stop".to_string(),
                    address: "2 Main St".to_string(),
                    city: "Lincoln".to_string(),
                    state: "IL".to_string(),
                    rack_id: 7,
                    retail_price: 3.2,
                    latitude: Some(39.5),
                    longitude: Some(-89.0),
                },
            ])
        }
    }

    fn planner(us: bool) -> RoutePlanner<FakeGeocoder, FakeDirections, FakeStations> {
        RoutePlanner::new(
            FakeGeocoder {
                calls: AtomicUsize::new(0),
                us,
            },
            FakeDirections {
                calls: AtomicUsize::new(0),
            },
            StationCatalog::new(FakeStations, &CatalogConfig::default()),
            PlanCache::new(&PlanCacheConfig::default()),
        )
    }

    fn request() -> PlanRequest {
        PlanRequest {
            start_location: "Start City".to_string(),
            end_location: "End City".to_string(),
            max_range_miles: 500,
            mpg: 10.0,
            max_station_distance_miles: 10.0,
        }
    }

    #[tokio::test]
    async fn computes_a_complete_plan() {
        let planner = planner(true);
        let plan = planner.compute_plan(&request()).await.unwrap();

        assert_eq!(plan.start.query, "Start City");
        assert_eq!(plan.route.distance_miles, 69.1);
        assert_eq!(plan.route.geometry_format, "polyline6");
        assert_eq!(plan.fueling.max_range_miles, 500);
        assert!(!plan.fueling.fuel_stops.is_empty());
        assert!(plan.fueling.total_cost > 0.0);
        assert_eq!(plan.assumptions.len(), 2);

        // First purchase is the virtual start anchor at mile 0.
        let first = &plan.fueling.fuel_stops[0];
        assert!(first.is_virtual);
        assert_eq!(first.mile_marker, 0.0);
    }

    #[tokio::test]
    async fn identical_requests_hit_the_cache() {
        let planner = planner(true);

        let first = planner.compute_plan(&request()).await.unwrap();
        let second = planner.compute_plan(&request()).await.unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(planner.geocoder.calls.load(Ordering::SeqCst), 2);
        assert_eq!(planner.directions.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_parameters_bypass_the_cache() {
        let planner = planner(true);

        planner.compute_plan(&request()).await.unwrap();

        let mut other = request();
        other.mpg = 8.0;
        planner.compute_plan(&other).await.unwrap();

        assert_eq!(planner.directions.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_us_endpoint_is_rejected() {
        let planner = planner(false);
        let err = planner.compute_plan(&request()).await.unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedRegion));
    }

    #[tokio::test]
    async fn validation_rejects_before_any_provider_call() {
        let planner = planner(true);

        let mut bad = request();
        bad.start_location = "  ".to_string();
        let err = planner.compute_plan(&bad).await.unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));

        let mut bad = request();
        bad.mpg = 0.0;
        assert!(matches!(
            planner.compute_plan(&bad).await.unwrap_err(),
            PlanError::Validation(_)
        ));

        let mut bad = request();
        bad.max_range_miles = 0;
        assert!(matches!(
            planner.compute_plan(&bad).await.unwrap_err(),
            PlanError::Validation(_)
        ));

        assert_eq!(planner.geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cache_key_is_deterministic_and_content_addressed() {
        let a = request().cache_key();
        let b = request().cache_key();
        assert_eq!(a, b);
        assert!(a.starts_with("route_plan:"));
        // SHA-256 hex digest after the prefix.
        assert_eq!(a.len(), "route_plan:".len() + 64);

        let mut other = request();
        other.max_station_distance_miles = 20.0;
        assert_ne!(a, other.cache_key());
    }

    #[test]
    fn request_defaults_apply_when_fields_are_omitted() {
        let request: PlanRequest = serde_json::from_value(serde_json::json!({
            "start_location": "A",
            "end_location": "B"
        }))
        .unwrap();

        assert_eq!(request.max_range_miles, 500);
        assert_eq!(request.mpg, 10.0);
        assert_eq!(request.max_station_distance_miles, 10.0);
    }
}
