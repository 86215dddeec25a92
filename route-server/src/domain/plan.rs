//! Route plan output types.
//!
//! These records are the planner's public result shape: they are serialized
//! into the plan cache and returned verbatim to API callers, so they derive
//! both `Serialize` and `Deserialize` and compare by value.

use serde::{Deserialize, Serialize};

use super::StationSummary;

/// A planned fuel purchase, immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStop {
    /// Miles from the route start, rounded to 2 decimals.
    pub mile_marker: f64,

    /// Price per gallon, rounded to 3 decimals.
    pub price_per_gallon: f64,

    /// Gallons purchased, rounded to 3 decimals.
    pub gallons: f64,

    /// Purchase cost in dollars, rounded to 2 decimals.
    pub cost: f64,

    pub latitude: f64,
    pub longitude: f64,

    /// True for the synthetic start purchase point.
    #[serde(rename = "virtual")]
    pub is_virtual: bool,

    /// Identity of the underlying station, when one exists.
    pub station: Option<StationSummary>,
}

/// Geocoded summary of a requested endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSummary {
    /// The location string as requested.
    pub query: String,

    /// Resolved place name from the geocoder.
    pub place_name: String,

    pub latitude: f64,
    pub longitude: f64,
}

/// Summary of the driving route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Driving distance in miles, rounded to 2 decimals.
    pub distance_miles: f64,

    /// Driving duration in seconds, rounded to 1 decimal.
    pub duration_seconds: f64,

    /// Raw encoded geometry as returned by the directions provider.
    pub geometry: String,

    /// Encoding of `geometry`, e.g. `polyline6`.
    pub geometry_format: String,
}

/// The fueling strategy for the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelingSummary {
    /// Vehicle range on a full tank, miles.
    pub max_range_miles: u32,

    /// Fuel economy in miles per gallon.
    pub mpg: f64,

    /// Total fuel spend in dollars, rounded to 2 decimals.
    pub total_cost: f64,

    /// Total gallons purchased, rounded to 3 decimals.
    pub total_gallons: f64,

    /// Purchases in route order.
    pub fuel_stops: Vec<FuelStop>,
}

/// A complete route plan: endpoints, route and fueling strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub start: EndpointSummary,
    pub end: EndpointSummary,
    pub route: RouteSummary,
    pub fueling: FuelingSummary,

    /// Human-readable notes about the assumptions behind the plan.
    pub assumptions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_stop_serializes_virtual_flag() {
        let stop = FuelStop {
            mile_marker: 0.0,
            price_per_gallon: 3.5,
            gallons: 10.0,
            cost: 35.0,
            latitude: 39.8,
            longitude: -89.6,
            is_virtual: true,
            station: None,
        };

        let json = serde_json::to_value(&stop).unwrap();
        assert_eq!(json["virtual"], serde_json::Value::Bool(true));
        assert!(json.get("is_virtual").is_none());
    }

    #[test]
    fn plan_round_trips_through_json() {
        let plan = RoutePlan {
            start: EndpointSummary {
                query: "Springfield, IL".to_string(),
                place_name: "Springfield, Illinois, United States".to_string(),
                latitude: 39.8,
                longitude: -89.6,
            },
            end: EndpointSummary {
                query: "St Louis, MO".to_string(),
                place_name: "St Louis, Missouri, United States".to_string(),
                latitude: 38.6,
                longitude: -90.2,
            },
            route: RouteSummary {
                distance_miles: 96.4,
                duration_seconds: 5600.0,
                geometry: "abc".to_string(),
                geometry_format: "polyline6".to_string(),
            },
            fueling: FuelingSummary {
                max_range_miles: 500,
                mpg: 10.0,
                total_cost: 35.0,
                total_gallons: 10.0,
                fuel_stops: Vec::new(),
            },
            assumptions: vec!["note".to_string()],
        };

        let json = serde_json::to_string(&plan).unwrap();
        let back: RoutePlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
