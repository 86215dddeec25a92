//! CSV ingestion for OPIS fuel price sheets.
//!
//! Reads truckstop rows into the station store and geocodes stations that
//! are missing coordinates. Row failures (unparseable fields, geocoding
//! misses) are counted and recorded but never abort the run; the caller
//! invalidates the catalog snapshot once ingestion completes.

use std::io::Read;

use serde::Deserialize;
use tracing::{info, warn};

use crate::mapbox::Geocoder;
use crate::stations::{NewStation, StationStore, UpsertOutcome};

/// A fatal ingestion failure: the input could not be read at all.
///
/// Per-row problems are reported in [`IngestReport::errors`] instead.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Counters and per-row errors from one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows read from the file, including failed ones.
    pub total_rows: usize,

    /// Newly created station records.
    pub created: usize,

    /// Existing records whose price was updated.
    pub updated: usize,

    /// Stations geocoded during this run.
    pub geocoded: usize,

    /// Rows that failed to parse or geocode.
    pub failed: usize,

    /// One message per failure, prefixed with the row number.
    pub errors: Vec<String>,
}

/// Raw CSV row in OPIS price sheet format. All fields are read as text
/// and parsed after trimming, matching how the sheets are padded.
#[derive(Debug, Deserialize)]
struct RawStationRow {
    #[serde(rename = "OPIS Truckstop ID")]
    opis_id: String,

    #[serde(rename = "Truckstop Name")]
    truckstop_name: String,

    #[serde(rename = "Address")]
    address: String,

    #[serde(rename = "City")]
    city: String,

    #[serde(rename = "State")]
    state: String,

    #[serde(rename = "Rack ID")]
    rack_id: String,

    #[serde(rename = "Retail Price")]
    retail_price: String,
}

impl RawStationRow {
    fn parse(self) -> Result<NewStation, String> {
        let opis_id = self
            .opis_id
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("bad OPIS Truckstop ID: {e}"))?;
        let rack_id = self
            .rack_id
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("bad Rack ID: {e}"))?;
        let retail_price = self
            .retail_price
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad Retail Price: {e}"))?;

        Ok(NewStation {
            opis_id,
            truckstop_name: self.truckstop_name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            rack_id,
            retail_price,
        })
    }
}

/// Ingest a CSV price sheet into the station store.
///
/// Rows upsert on the station's price-sheet identity; stations still
/// missing coordinates after the upsert are geocoded from
/// "address, city, state".
pub async fn ingest_stations<R: Read, G: Geocoder>(
    reader: R,
    store: &StationStore,
    geocoder: &G,
) -> Result<IngestReport, IngestError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut report = IngestReport::default();

    for (index, row) in csv_reader.deserialize::<RawStationRow>().enumerate() {
        let row_number = index + 1;
        report.total_rows += 1;

        let record = match row.map_err(|e| e.to_string()).and_then(RawStationRow::parse) {
            Ok(record) => record,
            Err(message) => {
                report.failed += 1;
                report.errors.push(format!("row {row_number}: {message}"));
                continue;
            }
        };

        let geocode_query = format!("{}, {}, {}", record.address, record.city, record.state);

        let outcome = store.upsert(record).await;
        match outcome {
            UpsertOutcome::Created(_) => report.created += 1,
            UpsertOutcome::Updated(_) => report.updated += 1,
        }

        let id = outcome.id();
        let needs_geocode = store
            .get(id)
            .await
            .is_some_and(|station| station.coordinates().is_none());
        if needs_geocode {
            match geocoder.geocode(&geocode_query).await {
                Ok(result) => {
                    store.set_coordinates(id, result.latitude, result.longitude).await;
                    report.geocoded += 1;
                }
                Err(e) => {
                    report.failed += 1;
                    report
                        .errors
                        .push(format!("row {row_number}: geocoding failed: {e}"));
                }
            }
        }
    }

    if report.failed > 0 {
        warn!(failed = report.failed, "ingestion completed with failures");
    }
    info!(
        total = report.total_rows,
        created = report.created,
        updated = report.updated,
        geocoded = report.geocoded,
        "ingested station price sheet"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::mapbox::{GeocodeResult, MapboxError};
    use crate::stations::StationProvider;

    const HEADER: &str =
        "OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price\n";

    struct FakeGeocoder {
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    impl FakeGeocoder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<GeocodeResult, MapboxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(needle) = self.fail_on
                && query.contains(needle)
            {
                return Err(MapboxError::NoMatch {
                    query: query.to_string(),
                });
            }
            Ok(GeocodeResult {
                latitude: 39.8,
                longitude: -89.6,
                place_name: query.to_string(),
                is_us: true,
            })
        }
    }

    #[tokio::test]
    async fn ingests_and_geocodes_new_stations() {
        let csv = format!(
            "{HEADER}1001,Stop A,1 Main St,Springfield,IL,7,3.459\n\
             1002,Stop B,2 Oak Ave,Decatur,IL,7,3.512\n"
        );
        let store = StationStore::new();
        let geocoder = FakeGeocoder::new();

        let report = ingest_stations(csv.as_bytes(), &store, &geocoder).await.unwrap();

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.created, 2);
        assert_eq!(report.updated, 0);
        assert_eq!(report.geocoded, 2);
        assert_eq!(report.failed, 0);
        assert!(report.errors.is_empty());

        let snapshot = store.fetch_geocoded().await.unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn reingest_updates_price_without_regeocode() {
        let first = format!("{HEADER}1001,Stop A,1 Main St,Springfield,IL,7,3.459\n");
        let second = format!("{HEADER}1001,Stop A,1 Main St,Springfield,IL,7,3.601\n");
        let store = StationStore::new();
        let geocoder = FakeGeocoder::new();

        ingest_stations(first.as_bytes(), &store, &geocoder).await.unwrap();
        let report = ingest_stations(second.as_bytes(), &store, &geocoder).await.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.geocoded, 0);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);

        let snapshot = store.fetch_geocoded().await.unwrap();
        assert_eq!(snapshot[0].retail_price, 3.601);
    }

    #[tokio::test]
    async fn bad_rows_are_counted_not_fatal() {
        let csv = format!(
            "{HEADER}not-a-number,Stop A,1 Main St,Springfield,IL,7,3.459\n\
             1002,Stop B,2 Oak Ave,Decatur,IL,7,not-a-price\n\
             1003,Stop C,3 Elm Rd,Peoria,IL,7,3.444\n"
        );
        let store = StationStore::new();
        let geocoder = FakeGeocoder::new();

        let report = ingest_stations(csv.as_bytes(), &store, &geocoder).await.unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("row 1:"));
        assert!(report.errors[1].starts_with("row 2:"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn geocode_failure_keeps_station_but_counts_failure() {
        let csv = format!("{HEADER}1001,Stop A,99 Nowhere Ln,Atlantis,ZZ,7,3.459\n");
        let store = StationStore::new();
        let geocoder = FakeGeocoder {
            calls: AtomicUsize::new(0),
            fail_on: Some("Nowhere"),
        };

        let report = ingest_stations(csv.as_bytes(), &store, &geocoder).await.unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.geocoded, 0);
        assert_eq!(report.failed, 1);
        assert!(report.errors[0].contains("geocoding failed"));

        // The record exists but is invisible to corridor search.
        assert_eq!(store.len().await, 1);
        assert!(store.fetch_geocoded().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fields_are_trimmed() {
        let csv = format!("{HEADER} 1001 , Stop A , 1 Main St , Springfield , IL , 7 , 3.459 \n");
        let store = StationStore::new();
        let geocoder = FakeGeocoder::new();

        let report = ingest_stations(csv.as_bytes(), &store, &geocoder).await.unwrap();
        assert_eq!(report.created, 1);

        let snapshot = store.fetch_geocoded().await.unwrap();
        assert_eq!(snapshot[0].truckstop_name, "Stop A");
        assert_eq!(snapshot[0].opis_id, 1001);
    }

    #[tokio::test]
    async fn reads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}1001,Stop A,1 Main St,Springfield,IL,7,3.459\n").unwrap();

        let store = StationStore::new();
        let geocoder = FakeGeocoder::new();
        let handle = std::fs::File::open(file.path()).unwrap();

        let report = ingest_stations(handle, &store, &geocoder).await.unwrap();
        assert_eq!(report.created, 1);
    }
}
