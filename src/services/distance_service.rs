//! Distance helpers for stops and route segments.
//!
//! Great-circle distances use the haversine formula on a spherical Earth of
//! radius 6371 km. Inputs are degrees, outputs are meters.
//!
//! Route segments store their path as `[lng, lat]` pairs (GeoJSON order),
//! while stops carry named `lat`/`lng` fields. The helpers here accept both.

use crate::models::{route::RouteSegment, stop::Coordinates};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in meters.
pub fn haversine_distance(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    (EARTH_RADIUS_KM * c * 1000.0).max(0.0)
}

/// Length of a `[lng, lat]` polyline, in meters. Fewer than two points is 0.
pub fn path_length(path: &[[f64; 2]]) -> f64 {
    path.windows(2)
        .map(|pair| {
            haversine_distance(
                Coordinates::new(pair[0][1], pair[0][0]),
                Coordinates::new(pair[1][1], pair[1][0]),
            )
        })
        .sum()
}

/// Fallback distance for a segment with no measured value: its drawn path
/// when it has one, otherwise the straight line between its endpoints.
pub fn estimate_segment_distance(
    segment: &RouteSegment,
    from: Coordinates,
    to: Coordinates,
) -> f64 {
    if segment.coordinates.len() >= 2 {
        path_length(&segment.coordinates)
    } else {
        haversine_distance(from, to)
    }
}
