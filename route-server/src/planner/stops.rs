//! Greedy fuel-stop planning.
//!
//! The strategy: at each purchase opportunity, buy only enough fuel to
//! reach the first strictly cheaper stop within tank range; if no cheaper
//! stop is reachable, fill up to maximum range or to the destination,
//! whichever is nearer. This is not globally optimal for every price
//! landscape, but downstream consumers depend on this exact lookahead and
//! tie-break behavior.

use tracing::debug;

use crate::domain::{FuelStop, RouteStop, StationSummary, StopKind};

use super::error::PlannerError;

/// Tolerance in gallons for the capacity and ledger checks.
const FUEL_EPSILON_GALLONS: f64 = 1e-6;

/// The planned purchases with their aggregate totals.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStops {
    /// Purchases in route order.
    pub stops: Vec<FuelStop>,

    /// Total spend in dollars, rounded to 2 decimals.
    pub total_cost: f64,

    /// Total gallons purchased, rounded to 3 decimals.
    pub total_gallons: f64,
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Plan fuel purchases along the route.
///
/// `stations` is the corridor-search output ordered by mile marker;
/// `start` is the virtual anchor from start-price selection. The walk
/// appends a destination sentinel at `total_miles` whose zero price makes
/// the lookahead terminate there.
///
/// Fails with [`PlannerError::RangeExceeded`] when a single leg between
/// purchase opportunities cannot be covered on a full tank, and with
/// [`PlannerError::InsufficientFuel`] if the fuel ledger ever goes
/// negative beyond tolerance (an internal inconsistency; the range check
/// fires first for infeasible inputs).
pub fn plan_fuel_stops(
    stations: &[RouteStop],
    total_miles: f64,
    mpg: f64,
    max_range_miles: f64,
    start: RouteStop,
) -> Result<PlannedStops, PlannerError> {
    let capacity_gallons = max_range_miles / mpg;

    let mut stops: Vec<RouteStop> = Vec::with_capacity(stations.len() + 2);
    stops.push(start);
    stops.extend(stations.iter().filter(|s| s.mile_marker > 0.0).cloned());
    stops.push(RouteStop::destination(total_miles));

    let mut fuel_gallons = 0.0;
    let mut total_cost = 0.0;
    let mut total_gallons = 0.0;
    let mut planned: Vec<FuelStop> = Vec::new();

    for index in 0..stops.len() - 1 {
        let stop = &stops[index];
        let next = &stops[index + 1];

        // A leg longer than the full-tank range is infeasible no matter
        // what gets purchased; reject it before the ledger can go negative.
        let leg_miles = next.mile_marker - stop.mile_marker;
        if leg_miles / mpg > capacity_gallons + FUEL_EPSILON_GALLONS {
            return Err(PlannerError::RangeExceeded);
        }

        // Look ahead for the first strictly cheaper stop within reach.
        let max_reach = stop.mile_marker + max_range_miles;
        let mut next_cheaper = None;
        for later in &stops[index + 1..] {
            if later.mile_marker > max_reach {
                break;
            }
            if later.price < stop.price {
                next_cheaper = Some(later);
                break;
            }
        }

        let target_miles = match next_cheaper {
            Some(cheaper) => cheaper.mile_marker - stop.mile_marker,
            None => max_range_miles.min(total_miles - stop.mile_marker),
        };

        let required_gallons = target_miles / mpg;
        if required_gallons > capacity_gallons + FUEL_EPSILON_GALLONS {
            return Err(PlannerError::RangeExceeded);
        }

        if fuel_gallons < required_gallons {
            let purchase = required_gallons - fuel_gallons;
            let cost = purchase * stop.price;
            fuel_gallons += purchase;
            total_cost += cost;
            total_gallons += purchase;

            if emits_fuel_stop(stop) {
                planned.push(FuelStop {
                    mile_marker: round_to(stop.mile_marker, 2),
                    price_per_gallon: round_to(stop.price, 3),
                    gallons: round_to(purchase, 3),
                    cost: round_to(cost, 2),
                    latitude: stop.latitude,
                    longitude: stop.longitude,
                    is_virtual: stop.is_virtual(),
                    station: stop.station().map(StationSummary::from),
                });
            }
        }

        fuel_gallons -= leg_miles / mpg;
        if fuel_gallons < -FUEL_EPSILON_GALLONS {
            return Err(PlannerError::InsufficientFuel);
        }
    }

    debug!(
        stops = planned.len(),
        total_cost, total_gallons, "planned fuel stops"
    );

    Ok(PlannedStops {
        stops: planned,
        total_cost: round_to(total_cost, 2),
        total_gallons: round_to(total_gallons, 3),
    })
}

/// Whether a purchase at this stop appears in the output.
///
/// Real stations always do; the start anchor does because it represents
/// the departure fill-up; the destination sentinel never does.
fn emits_fuel_stop(stop: &RouteStop) -> bool {
    match stop.kind {
        StopKind::Station(_) => true,
        StopKind::StartAnchor(_) => stop.mile_marker == 0.0,
        StopKind::Destination => false,
    }
}
