//! Start-price selection.

use std::cmp::Ordering;

use crate::domain::{RouteStop, StopKind};

use super::error::PlannerError;

/// Choose the station whose price applies at the route start.
///
/// Among stations within `max_start_distance_miles` of the start, the
/// winner minimizes (mile marker, price) lexicographically: the closest
/// station to the start, and the cheapest among ties at the same marker.
/// The winner is re-emitted as a virtual anchor at mile 0 so the planner
/// can treat departure as a purchase opportunity at that price.
pub fn choose_start_price(
    stations: &[RouteStop],
    max_start_distance_miles: f64,
) -> Result<RouteStop, PlannerError> {
    if stations.is_empty() {
        return Err(PlannerError::NoStations);
    }

    let candidate = stations
        .iter()
        .filter(|s| s.mile_marker <= max_start_distance_miles)
        .min_by(|a, b| {
            (a.mile_marker, a.price)
                .partial_cmp(&(b.mile_marker, b.price))
                .unwrap_or(Ordering::Equal)
        })
        .ok_or(PlannerError::NoStartCandidate)?;

    let source = match &candidate.kind {
        StopKind::Station(station) | StopKind::StartAnchor(station) => station.clone(),
        // Sentinels never appear in corridor output.
        StopKind::Destination => return Err(PlannerError::NoStartCandidate),
    };

    Ok(RouteStop {
        kind: StopKind::StartAnchor(source),
        price: candidate.price,
        mile_marker: 0.0,
        distance_to_route: candidate.distance_to_route,
        latitude: candidate.latitude,
        longitude: candidate.longitude,
    })
}
