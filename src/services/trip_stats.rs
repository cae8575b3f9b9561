use crate::models::{
    route::{RouteSegment, TransportMode},
    stop::Stop,
    trip::TripStats,
};

/// Derive trip statistics from its stops and routes.
///
/// Pure and deterministic: the same inputs always produce the same stats.
/// `difficulty_level` is caller-owned and always comes back `None`.
pub fn compute_stats(stops: &[Stop], routes: &[RouteSegment]) -> TripStats {
    let stop_count = stops.len() as u32;
    let estimated_duration = total_stop_minutes(stops);

    let average_stop_duration = if stop_count == 0 {
        0.0
    } else {
        estimated_duration as f64 / stop_count as f64
    };

    TripStats {
        total_distance: total_distance(routes),
        estimated_duration,
        stop_count,
        average_stop_duration,
        transport_modes: transport_modes(routes),
        estimated_cost: estimated_cost(stops),
        difficulty_level: None,
    }
}

/// Sum of route distances in meters. Segments without a distance count as 0.
pub fn total_distance(routes: &[RouteSegment]) -> f64 {
    routes.iter().map(|r| r.distance.unwrap_or(0.0)).sum()
}

pub fn total_stop_minutes(stops: &[Stop]) -> u64 {
    stops.iter().map(|s| u64::from(s.estimated_duration)).sum()
}

/// Sum of stop costs. A stop with no cost counts as 0.
pub fn estimated_cost(stops: &[Stop]) -> f64 {
    stops.iter().filter_map(|s| s.cost).sum()
}

/// Distinct modes in first-seen order, or `[Walking]` when there are no routes.
pub fn transport_modes(routes: &[RouteSegment]) -> Vec<TransportMode> {
    let mut modes: Vec<TransportMode> = Vec::new();
    for route in routes {
        if !modes.contains(&route.transport_mode) {
            modes.push(route.transport_mode);
        }
    }

    if modes.is_empty() {
        modes.push(TransportMode::Walking);
    }

    modes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stop::Coordinates;
    use chrono::{TimeZone, Utc};

    fn stop(duration: u32, cost: Option<f64>) -> Stop {
        let arrival = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut stop = Stop::new("stop", Coordinates::new(0.0, 0.0), arrival);
        stop.estimated_duration = duration;
        stop.cost = cost;
        stop
    }

    fn route(distance: f64, mode: TransportMode) -> RouteSegment {
        let mut route = RouteSegment::new(1, 2, mode);
        route.distance = Some(distance);
        route
    }

    #[test]
    fn test_cost_and_distance_sums() {
        let stops = vec![stop(60, Some(10.0)), stop(60, None)];
        let routes = vec![
            route(500.0, TransportMode::Walking),
            route(1500.0, TransportMode::Walking),
        ];

        let stats = compute_stats(&stops, &routes);
        assert_eq!(stats.total_distance, 2000.0);
        assert_eq!(stats.estimated_cost, 10.0);
        assert_eq!(stats.stop_count, 2);
    }

    #[test]
    fn test_average_stop_duration() {
        let stops = vec![stop(30, None), stop(90, None), stop(45, None)];
        let stats = compute_stats(&stops, &[]);
        assert_eq!(stats.estimated_duration, 165);
        assert_eq!(stats.average_stop_duration, 55.0);
    }

    #[test]
    fn test_empty_trip() {
        let stats = compute_stats(&[], &[]);
        assert_eq!(stats.stop_count, 0);
        assert_eq!(stats.average_stop_duration, 0.0);
        assert_eq!(stats.total_distance, 0.0);
        assert_eq!(stats.estimated_cost, 0.0);
        assert_eq!(stats.transport_modes, vec![TransportMode::Walking]);
    }

    #[test]
    fn test_transport_modes_first_seen_order() {
        let routes = vec![
            route(1.0, TransportMode::Car),
            route(1.0, TransportMode::Boat),
            route(1.0, TransportMode::Car),
            route(1.0, TransportMode::Walking),
        ];
        assert_eq!(
            transport_modes(&routes),
            vec![TransportMode::Car, TransportMode::Boat, TransportMode::Walking]
        );
    }

    #[test]
    fn test_distance_sum_is_order_independent() {
        let mut routes = vec![
            route(250.0, TransportMode::Car),
            route(1250.0, TransportMode::Car),
            route(500.0, TransportMode::Car),
        ];
        let forward = total_distance(&routes);
        routes.reverse();
        assert_eq!(forward, total_distance(&routes));
        assert_eq!(forward, 2000.0);
    }

    #[test]
    fn test_compute_stats_is_idempotent() {
        let stops = vec![stop(20, Some(3.5)), stop(40, Some(1.25))];
        let routes = vec![route(321.5, TransportMode::Cycling)];
        assert_eq!(compute_stats(&stops, &routes), compute_stats(&stops, &routes));
    }
}
