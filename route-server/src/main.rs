use std::net::SocketAddr;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_server::cache::{PlanCache, PlanCacheConfig};
use route_server::ingest::ingest_stations;
use route_server::mapbox::{
    CachedGeocoder, GeocodeCacheConfig, MapboxClient, MapboxConfig, MapboxDirections,
    MapboxGeocoder,
};
use route_server::plan::RoutePlanner;
use route_server::stations::{CatalogConfig, StationCatalog, StationStore};
use route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let access_token = std::env::var("MAPBOX_ACCESS_TOKEN").unwrap_or_else(|_| {
        warn!("MAPBOX_ACCESS_TOKEN not set; provider calls will fail");
        String::new()
    });

    let mapbox = MapboxClient::new(MapboxConfig::new(&access_token))
        .expect("failed to create Mapbox client");
    let geocoder = CachedGeocoder::new(
        MapboxGeocoder::new(mapbox.clone()),
        &GeocodeCacheConfig::default(),
    );
    let directions = MapboxDirections::new(mapbox);

    let store = StationStore::new();

    // Seed the catalog from a price sheet when one is configured.
    if let Ok(path) = std::env::var("STATIONS_CSV") {
        match std::fs::File::open(&path) {
            Ok(file) => match ingest_stations(file, &store, &geocoder).await {
                Ok(report) => info!(
                    path,
                    created = report.created,
                    updated = report.updated,
                    geocoded = report.geocoded,
                    failed = report.failed,
                    "seeded station catalog"
                ),
                Err(e) => error!(path, error = %e, "station ingestion failed"),
            },
            Err(e) => error!(path, error = %e, "could not open stations CSV"),
        }
    }

    let catalog = StationCatalog::new(store, &CatalogConfig::default());
    let plans = PlanCache::new(&PlanCacheConfig::default());
    let planner = RoutePlanner::new(geocoder, directions, catalog, plans);

    let state = AppState::new(planner);
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!(%addr, "fuel route planner listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
