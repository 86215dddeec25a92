//! Application state for the web layer.

use std::sync::Arc;

use crate::mapbox::{CachedGeocoder, MapboxDirections, MapboxGeocoder};
use crate::plan::RoutePlanner;
use crate::stations::StationStore;

/// The concrete planner wired to the Mapbox clients and the in-memory
/// station store.
pub type AppPlanner = RoutePlanner<CachedGeocoder<MapboxGeocoder>, MapboxDirections, StationStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The plan orchestrator.
    pub planner: Arc<AppPlanner>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: AppPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}
