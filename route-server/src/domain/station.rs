//! Fuel station catalog records.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A truck fuel station from the OPIS price catalog.
///
/// Only stations with both coordinates present participate in corridor
/// search; freshly ingested rows have `None` until geocoding fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStation {
    /// Store-assigned identifier.
    pub id: u64,

    /// OPIS truckstop identifier.
    pub opis_id: i64,

    /// Truckstop name as listed in the price sheet.
    pub truckstop_name: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// Two-letter state code.
    pub state: String,

    /// OPIS rack identifier.
    pub rack_id: i64,

    /// Retail price per gallon in dollars.
    pub retail_price: f64,

    /// Latitude in decimal degrees, if geocoded.
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees, if geocoded.
    pub longitude: Option<f64>,
}

impl FuelStation {
    /// Coordinates of the station, if both are known.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// The natural identity of the station in the price sheet.
    ///
    /// Re-ingesting a row with the same identity updates the price rather
    /// than creating a duplicate record.
    pub fn identity(&self) -> StationIdentity {
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

/// Upsert key for catalog records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationIdentity {
    pub opis_id: i64,
    pub truckstop_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rack_id: i64,
}

/// Station identity fields attached to an emitted fuel stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub opis_id: i64,
    pub truckstop_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rack_id: i64,
}

impl From<&FuelStation> for StationSummary {
    fn from(station: &FuelStation) -> Self {
        Self {
            opis_id: station.opis_id,
            truckstop_name: station.truckstop_name.clone(),
            address: station.address.clone(),
            city: station.city.clone(),
            state: station.state.clone(),
            rack_id: station.rack_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_require_both_fields() {
        let mut station = FuelStation {
            id: 1,
            opis_id: 1001,
            truckstop_name: "Stop 1".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            rack_id: 7,
            retail_price: 3.5,
            latitude: Some(39.8),
            longitude: Some(-89.6),
        };
        assert!(station.coordinates().is_some());

        station.longitude = None;
        assert!(station.coordinates().is_none());

        station.longitude = Some(-89.6);
        station.latitude = None;
        assert!(station.coordinates().is_none());
    }

    #[test]
    fn identity_ignores_price_and_coordinates() {
        let a = FuelStation {
            id: 1,
            opis_id: 1001,
            truckstop_name: "Stop 1".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            rack_id: 7,
            retail_price: 3.5,
            latitude: Some(39.8),
            longitude: Some(-89.6),
        };
        let mut b = a.clone();
        b.retail_price = 4.2;
        b.latitude = None;
        assert_eq!(a.identity(), b.identity());
    }
}
