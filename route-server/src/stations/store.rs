//! In-memory station store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{FuelStation, StationIdentity};

use super::catalog::StationProvider;
use super::error::CatalogError;

/// A new or re-ingested catalog row, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewStation {
    pub opis_id: i64,
    pub truckstop_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rack_id: i64,
    pub retail_price: f64,
}

impl NewStation {
    fn identity(&self) -> StationIdentity {
        StationIdentity {
            opis_id: self.opis_id,
            truckstop_name: self.truckstop_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            rack_id: self.rack_id,
        }
    }
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was created with this id.
    Created(u64),

    /// An existing record matched by identity had its price updated.
    Updated(u64),
}

impl UpsertOutcome {
    /// The id of the affected record.
    pub fn id(self) -> u64 {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    stations: HashMap<u64, FuelStation>,
    by_identity: HashMap<StationIdentity, u64>,
    next_id: u64,
}

/// Shared in-memory station catalog store.
///
/// Rows are keyed by their price-sheet identity so repeated ingestion
/// updates prices in place. Cheap to clone; all clones share state.
#[derive(Debug, Clone, Default)]
pub struct StationStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl StationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, or update the price of an existing record with the
    /// same identity. Coordinates of an existing record are preserved.
    pub async fn upsert(&self, record: NewStation) -> UpsertOutcome {
        let mut inner = self.inner.write().await;
        let identity = record.identity();

        if let Some(&id) = inner.by_identity.get(&identity) {
            if let Some(existing) = inner.stations.get_mut(&id) {
                existing.retail_price = record.retail_price;
            }
            return UpsertOutcome::Updated(id);
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.stations.insert(
            id,
            FuelStation {
                id,
                opis_id: record.opis_id,
                truckstop_name: record.truckstop_name,
                address: record.address,
                city: record.city,
                state: record.state,
                rack_id: record.rack_id,
                retail_price: record.retail_price,
                latitude: None,
                longitude: None,
            },
        );
        inner.by_identity.insert(identity, id);
        UpsertOutcome::Created(id)
    }

    /// Set the coordinates of a stored record.
    pub async fn set_coordinates(&self, id: u64, latitude: f64, longitude: f64) {
        let mut inner = self.inner.write().await;
        if let Some(station) = inner.stations.get_mut(&id) {
            station.latitude = Some(latitude);
            station.longitude = Some(longitude);
        }
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: u64) -> Option<FuelStation> {
        self.inner.read().await.stations.get(&id).cloned()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.inner.read().await.stations.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl StationProvider for StationStore {
    async fn fetch_geocoded(&self) -> Result<Vec<FuelStation>, CatalogError> {
        let inner = self.inner.read().await;
        let mut stations: Vec<FuelStation> = inner
            .stations
            .values()
            .filter(|s| s.coordinates().is_some())
            .cloned()
            .collect();
        // Deterministic snapshot order regardless of map iteration order.
        stations.sort_by_key(|s| s.id);
        Ok(stations)
    }
}
