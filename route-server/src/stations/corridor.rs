//! Corridor search: stations within reach of a route.

use std::cmp::Ordering;

use crate::domain::{FuelStation, GeoPoint, RouteStop, StopKind};
use crate::geo::{
    DEFAULT_MIN_MILES, bounding_box, build_mile_markers, haversine_miles, simplify_route,
};

/// Find catalog stations within `max_distance_miles` of the route.
///
/// The route is simplified to roughly one-mile spacing before distance
/// checks; a bounding box padded by the corridor width rejects far-away
/// stations cheaply before any per-point distance work. Each kept station
/// is annotated with the mile marker of its nearest route point, and the
/// result is ordered by mile marker (stable for ties).
pub fn find_stations_on_route(
    route_points: &[GeoPoint],
    stations: &[FuelStation],
    max_distance_miles: f64,
) -> Vec<RouteStop> {
    if route_points.is_empty() {
        return Vec::new();
    }

    let simplified = simplify_route(route_points, DEFAULT_MIN_MILES);
    let markers = build_mile_markers(&simplified);
    let Some(bbox) = bounding_box(&simplified, max_distance_miles) else {
        return Vec::new();
    };

    let mut on_route = Vec::new();

    for station in stations {
        let Some(location) = station.coordinates() else {
            continue;
        };
        if !bbox.contains(location) {
            continue;
        }

        let mut min_distance = f64::INFINITY;
        let mut mile_marker = 0.0;
        for marker in &markers {
            let distance = haversine_miles(location, marker.point);
            if distance < min_distance {
                min_distance = distance;
                mile_marker = marker.miles;
            }
        }

        if min_distance > max_distance_miles {
            continue;
        }

        on_route.push(RouteStop {
            price: station.retail_price,
            mile_marker,
            distance_to_route: min_distance,
            latitude: location.latitude,
            longitude: location.longitude,
            kind: StopKind::Station(station.clone()),
        });
    }

    on_route.sort_by(|a, b| {
        a.mile_marker
            .partial_cmp(&b.mile_marker)
            .unwrap_or(Ordering::Equal)
    });

    on_route
}
