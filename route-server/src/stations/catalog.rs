//! Cached snapshot of the station catalog.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::FuelStation;

use super::error::CatalogError;

/// Default snapshot TTL: 24 hours.
const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Read access to the station catalog.
///
/// Implementations return only geocoded stations; rows without
/// coordinates cannot participate in corridor search.
pub trait StationProvider {
    /// Fetch all geocoded stations.
    fn fetch_geocoded(
        &self,
    ) -> impl Future<Output = Result<Vec<FuelStation>, CatalogError>> + Send;
}

/// Configuration for the catalog snapshot cache.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// How long a snapshot remains valid.
    pub ttl: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SNAPSHOT_TTL,
        }
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    taken_at: Instant,
    stations: Arc<Vec<FuelStation>>,
}

/// Station catalog with a time-bounded full snapshot.
///
/// Corridor search scans the whole geocoded catalog per request, so the
/// snapshot is held in memory and refreshed at most once per TTL.
/// [`invalidate`] drops the snapshot whenever the underlying catalog
/// changes.
///
/// [`invalidate`]: StationCatalog::invalidate
#[derive(Debug)]
pub struct StationCatalog<P> {
    provider: P,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl<P: StationProvider> StationCatalog<P> {
    /// Create a catalog over the given provider.
    pub fn new(provider: P, config: &CatalogConfig) -> Self {
        Self {
            provider,
            ttl: config.ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// The current geocoded-station snapshot, refreshed when stale.
    pub async fn stations(&self) -> Result<Arc<Vec<FuelStation>>, CatalogError> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref()
            && snapshot.taken_at.elapsed() < self.ttl
        {
            return Ok(Arc::clone(&snapshot.stations));
        }

        let stations = Arc::new(self.provider.fetch_geocoded().await?);
        debug!(count = stations.len(), "refreshed station snapshot");

        let mut slot = self.snapshot.write().await;
        *slot = Some(Snapshot {
            taken_at: Instant::now(),
            stations: Arc::clone(&stations),
        });

        Ok(stations)
    }

    /// Drop the cached snapshot. The next call to [`Self::stations`]
    /// fetches fresh data.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }

    /// Access the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
