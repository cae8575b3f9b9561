//! Trip Aggregate Manager
//!
//! Keeps a trip consistent before it is written: validates every field,
//! hands out stop ids, renumbers stop order, backfills legacy fields and
//! recomputes [`TripStats`](crate::models::trip::TripStats).
//!
//! Nothing in here touches storage. The caller loads a trip, applies its
//! change in memory, runs [`TripAggregateManager::normalize`] and stores the
//! result.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;

use crate::error::{TripError, TripResult};
use crate::models::{route::RouteSegment, stop::Stop, trip::{Trip, Visibility}};
use crate::services::distance_service::estimate_segment_distance;
use crate::services::stop_ids::{StopIdAllocator, TimestampIdAllocator};
use crate::services::trip_stats::compute_stats;
use crate::services::trip_validation::{reconcile_stop_status, validate_trip};

/// What the caller changed on the trip since it was loaded.
#[derive(Debug, Clone, Default)]
pub struct TripChanges {
    pub stops: bool,
    pub routes: bool,
    /// Existing stops whose content was edited. New stops (no id yet) and
    /// stops whose order moves are always treated as touched.
    pub edited_stops: HashSet<i64>,
}

impl TripChanges {
    /// Plain field edits; stops and routes untouched.
    pub fn fields() -> Self {
        Self::default()
    }

    /// A brand new trip: every collection counts as touched.
    pub fn created() -> Self {
        Self {
            stops: true,
            routes: true,
            edited_stops: HashSet::new(),
        }
    }

    pub fn stops() -> Self {
        Self {
            stops: true,
            ..Self::default()
        }
    }

    pub fn stops_edited(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            stops: true,
            routes: false,
            edited_stops: ids.into_iter().collect(),
        }
    }

    pub fn routes() -> Self {
        Self {
            routes: true,
            ..Self::default()
        }
    }

    pub fn and_routes(mut self) -> Self {
        self.routes = true;
        self
    }
}

pub struct TripAggregateManager<A = TimestampIdAllocator> {
    allocator: A,
}

impl Default for TripAggregateManager<TimestampIdAllocator> {
    fn default() -> Self {
        Self::new(TimestampIdAllocator::default())
    }
}

impl<A: StopIdAllocator> TripAggregateManager<A> {
    pub fn new(allocator: A) -> Self {
        Self { allocator }
    }

    pub fn normalize(&mut self, trip: Trip, changes: &TripChanges) -> TripResult<Trip> {
        self.normalize_at(trip, changes, Utc::now())
    }

    /// [`normalize`](Self::normalize) with an explicit clock reading.
    pub fn normalize_at(
        &mut self,
        mut trip: Trip,
        changes: &TripChanges,
        now: DateTime<Utc>,
    ) -> TripResult<Trip> {
        validate_trip(&trip)?;
        for (i, stop) in trip.stops.iter_mut().enumerate() {
            reconcile_stop_status(stop, &format!("stops[{}]", i))?;
        }

        let stamp = next_timestamp(trip.updated_at, now);
        trip.updated_at = Some(stamp);
        if trip.created_at.is_none() {
            trip.created_at = Some(stamp);
        }
        let trip_id = *trip.id.get_or_insert_with(ObjectId::new);

        backfill_legacy_fields(&mut trip);

        check_unique_stop_ids(&trip.stops)?;
        if changes.stops {
            self.normalize_stops(&mut trip.stops, trip_id, changes, stamp)?;
        }

        check_route_references(&trip.routes, &trip.stops)?;
        normalize_routes(&mut trip.routes, &trip.stops, stamp)?;

        let difficulty_level = trip.stats.difficulty_level;
        trip.stats = compute_stats(&trip.stops, &trip.routes);
        trip.stats.difficulty_level = difficulty_level;

        log::debug!(
            "Normalized trip {}: {} stops, {} routes, {:.0} m",
            trip_id,
            trip.stats.stop_count,
            trip.routes.len(),
            trip.stats.total_distance
        );

        Ok(trip)
    }

    fn normalize_stops(
        &mut self,
        stops: &mut Vec<Stop>,
        trip_id: ObjectId,
        changes: &TripChanges,
        stamp: DateTime<Utc>,
    ) -> TripResult<()> {
        let mut taken: HashSet<i64> = stops.iter().filter_map(|s| s.id).collect();
        let mut touched = vec![false; stops.len()];

        for (i, stop) in stops.iter_mut().enumerate() {
            match stop.trip_id {
                Some(owner) if owner != trip_id => {
                    return Err(TripError::Integrity(format!(
                        "stops[{}] belongs to trip {}, not {}",
                        i, owner, trip_id
                    )));
                }
                Some(_) => {}
                None => {
                    stop.trip_id = Some(trip_id);
                    touched[i] = true;
                }
            }

            match stop.id {
                Some(id) => {
                    if changes.edited_stops.contains(&id) {
                        touched[i] = true;
                    }
                }
                None => {
                    let id = self.allocator.allocate(&taken);
                    if !taken.insert(id) {
                        return Err(TripError::Integrity(format!(
                            "stop id allocator returned id {} which is already in use",
                            id
                        )));
                    }
                    stop.id = Some(id);
                    stop.created_at.get_or_insert(stamp);
                    touched[i] = true;
                }
            }
        }

        // Explicit order first, array position for stops without one and
        // for ties, then renumber 1..N.
        let mut entries: Vec<(u32, usize, Stop, bool)> = std::mem::take(stops)
            .into_iter()
            .zip(touched)
            .enumerate()
            .map(|(pos, (stop, touched))| {
                let key = stop.order.unwrap_or(pos as u32 + 1);
                (key, pos, stop, touched)
            })
            .collect();
        entries.sort_by_key(|(key, pos, _, _)| (*key, *pos));

        for (index, (_, _, mut stop, mut touched)) in entries.into_iter().enumerate() {
            let order = index as u32 + 1;
            if stop.order != Some(order) {
                stop.order = Some(order);
                touched = true;
            }
            if touched {
                stop.updated_at = Some(stamp);
            }
            stops.push(stop);
        }

        Ok(())
    }
}

/// Rebuild `trip.stops` in the order of `ordered_ids`, which must name every
/// stop on the trip exactly once. The trip is left untouched on error.
pub fn reorder_stops(trip: &mut Trip, ordered_ids: &[i64]) -> TripResult<()> {
    let mut positions: HashMap<i64, usize> = HashMap::with_capacity(trip.stops.len());
    for (pos, stop) in trip.stops.iter().enumerate() {
        let id = stop.id.ok_or_else(|| {
            TripError::Integrity(format!("stops[{}] has no id and cannot be reordered", pos))
        })?;
        positions.insert(id, pos);
    }

    if let Some(unknown) = ordered_ids.iter().find(|id| !positions.contains_key(*id)) {
        return Err(TripError::Integrity(format!("stop {} is not on this trip", unknown)));
    }

    let mut seen = HashSet::with_capacity(ordered_ids.len());
    for id in ordered_ids {
        if !seen.insert(*id) {
            return Err(TripError::Integrity(format!(
                "stop {} appears more than once in the new order",
                id
            )));
        }
    }

    if ordered_ids.len() != trip.stops.len() {
        return Err(TripError::Integrity(format!(
            "new order lists {} stops but the trip has {}",
            ordered_ids.len(),
            trip.stops.len()
        )));
    }

    let mut slots: Vec<Option<Stop>> = std::mem::take(&mut trip.stops)
        .into_iter()
        .map(Some)
        .collect();

    trip.stops = ordered_ids
        .iter()
        .filter_map(|id| positions.get(id).and_then(|pos| slots[*pos].take()))
        .enumerate()
        .map(|(index, mut stop)| {
            stop.order = Some(index as u32 + 1);
            stop
        })
        .collect();

    Ok(())
}

/// `now`, or one millisecond past `previous` if the clock has not moved on.
fn next_timestamp(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(previous) if now <= previous => previous + Duration::milliseconds(1),
        _ => now,
    }
}

fn backfill_legacy_fields(trip: &mut Trip) {
    if trip.length.is_none() {
        trip.length = trip.estimated_duration;
    }

    if trip.visibility.is_none() {
        trip.visibility = Some(if trip.is_public {
            Visibility::Public
        } else {
            Visibility::Private
        });
    }

    trip.tags = dedupe_trimmed(std::mem::take(&mut trip.tags));
    trip.shared_with = dedupe_trimmed(std::mem::take(&mut trip.shared_with));
}

fn dedupe_trimmed(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}

fn check_unique_stop_ids(stops: &[Stop]) -> TripResult<()> {
    let mut seen = HashSet::with_capacity(stops.len());
    for (i, stop) in stops.iter().enumerate() {
        if let Some(id) = stop.id {
            if !seen.insert(id) {
                return Err(TripError::Integrity(format!(
                    "stops[{}] reuses stop id {}",
                    i, id
                )));
            }
        }
    }
    Ok(())
}

fn check_route_references(routes: &[RouteSegment], stops: &[Stop]) -> TripResult<()> {
    let stop_ids: HashSet<i64> = stops.iter().filter_map(|s| s.id).collect();
    let mut route_ids = HashSet::with_capacity(routes.len());

    for (i, route) in routes.iter().enumerate() {
        for stop_id in [route.from_stop_id, route.to_stop_id] {
            if !stop_ids.contains(&stop_id) {
                return Err(TripError::Integrity(format!(
                    "routes[{}] references stop {} which is not on this trip",
                    i, stop_id
                )));
            }
        }

        if let Some(id) = &route.id {
            if !route_ids.insert(id.as_str()) {
                return Err(TripError::Integrity(format!(
                    "routes[{}] reuses route id {}",
                    i, id
                )));
            }
        }
    }

    Ok(())
}

/// Fill in missing route ids, distances and creation times. Values the
/// caller supplied are never replaced.
fn normalize_routes(
    routes: &mut [RouteSegment],
    stops: &[Stop],
    stamp: DateTime<Utc>,
) -> TripResult<()> {
    let coordinates: HashMap<i64, _> = stops
        .iter()
        .filter_map(|s| s.id.map(|id| (id, s.coordinates)))
        .collect();

    for route in routes.iter_mut() {
        if route.id.is_none() {
            route.id = Some(uuid::Uuid::new_v4().to_string());
        }

        if route.distance.is_none() {
            let (Some(from), Some(to)) = (
                coordinates.get(&route.from_stop_id),
                coordinates.get(&route.to_stop_id),
            ) else {
                return Err(TripError::Integrity(format!(
                    "route {} between {} and {} has no endpoints on this trip",
                    route.id.as_deref().unwrap_or_default(),
                    route.from_stop_id,
                    route.to_stop_id
                )));
            };
            route.distance = Some(estimate_segment_distance(route, *from, *to));
        }

        route.created_at.get_or_insert(stamp);
    }

    Ok(())
}
