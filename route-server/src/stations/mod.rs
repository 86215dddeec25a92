//! Station catalog access and corridor search.

mod catalog;
mod corridor;
mod error;
mod store;

pub use catalog::{CatalogConfig, StationCatalog, StationProvider};
pub use corridor::find_stations_on_route;
pub use error::CatalogError;
pub use store::{NewStation, StationStore, UpsertOutcome};
