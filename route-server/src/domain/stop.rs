//! Candidate stops along a route.

use super::FuelStation;

/// What a route stop actually is.
///
/// The planner walks a sequence that starts with a synthetic purchase
/// point and ends with a synthetic destination; making the distinction a
/// variant (rather than a nullable station reference) keeps the emission
/// rules exhaustively checked.
#[derive(Debug, Clone, PartialEq)]
pub enum StopKind {
    /// A real catalog station at its position along the route.
    Station(FuelStation),

    /// The synthetic start purchase point, anchored at mile 0 and carrying
    /// the price and identity of the nearest-to-start station.
    StartAnchor(FuelStation),

    /// The end-of-route sentinel. Never emitted as a fuel stop.
    Destination,
}

/// A stop candidate positioned along the simplified route.
///
/// Produced by corridor search for real stations and by start-price
/// selection for the anchor; transient per planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub kind: StopKind,

    /// Price per gallon at this stop. Zero for the destination sentinel so
    /// that the lookahead always terminates there.
    pub price: f64,

    /// Cumulative miles from the route start to the nearest route point.
    pub mile_marker: f64,

    /// Perpendicular distance from the route in miles.
    pub distance_to_route: f64,

    pub latitude: f64,
    pub longitude: f64,
}

impl RouteStop {
    /// The end-of-route sentinel at `total_miles`.
    pub fn destination(total_miles: f64) -> Self {
        Self {
            kind: StopKind::Destination,
            price: 0.0,
            mile_marker: total_miles,
            distance_to_route: 0.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// Whether this stop is a planning sentinel rather than a real station.
    pub fn is_virtual(&self) -> bool {
        matches!(
            self.kind,
            StopKind::StartAnchor(_) | StopKind::Destination
        )
    }

    /// The underlying station record, if any.
    pub fn station(&self) -> Option<&FuelStation> {
        match &self.kind {
            StopKind::Station(station) | StopKind::StartAnchor(station) => Some(station),
            StopKind::Destination => None,
        }
    }
}
