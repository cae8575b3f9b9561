use mongodb::bson::oid::ObjectId;
use std::sync::{Mutex, PoisonError};

use crate::db::trip_store::TripStore;
use crate::error::{TripError, TripResult};
use crate::models::{
    route::RouteSegment,
    search::TripQuery,
    stop::{Stop, StopStatus},
    trip::{Trip, TripStats, TripUpdate, Visibility},
};
use crate::services::stop_ids::{StopIdAllocator, TimestampIdAllocator};
use crate::services::trip_aggregate::{reorder_stops, TripAggregateManager, TripChanges};
use crate::services::trip_stats::compute_stats;

pub const DEFAULT_DISCOVER_LIMIT: u32 = 20;

pub fn parse_trip_id(id: &str) -> TripResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| TripError::InvalidId(id.to_string()))
}

/// Trip operations on top of a [`TripStore`].
///
/// Every mutation loads the current trip, applies the change in memory,
/// normalizes it and writes it back guarded by the version it was loaded at.
/// A concurrent writer surfaces as [`TripError::Conflict`].
pub struct TripService<S, A = TimestampIdAllocator> {
    store: S,
    manager: Mutex<TripAggregateManager<A>>,
    discover_default_limit: u32,
}

impl<S: TripStore> TripService<S> {
    pub fn new(store: S) -> Self {
        Self::with_allocator(store, TimestampIdAllocator::default())
    }
}

impl<S: TripStore, A: StopIdAllocator> TripService<S, A> {
    pub fn with_allocator(store: S, allocator: A) -> Self {
        Self {
            store,
            manager: Mutex::new(TripAggregateManager::new(allocator)),
            discover_default_limit: DEFAULT_DISCOVER_LIMIT,
        }
    }

    pub fn with_discover_limit(mut self, limit: u32) -> Self {
        self.discover_default_limit = limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn normalize(&self, trip: Trip, changes: &TripChanges) -> TripResult<Trip> {
        // allocator state stays valid even if a previous holder panicked
        let mut manager = self.manager.lock().unwrap_or_else(PoisonError::into_inner);
        manager.normalize(trip, changes)
    }

    async fn load(&self, id: &ObjectId) -> TripResult<Trip> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| TripError::not_found("Trip", id.to_hex()))
    }

    async fn mutate<F>(&self, id: &ObjectId, apply: F) -> TripResult<Trip>
    where
        F: FnOnce(&mut Trip) -> TripResult<TripChanges>,
    {
        let mut trip = self.load(id).await?;
        let expected_version = trip.version;
        let changes = apply(&mut trip)?;
        let trip = self.normalize(trip, &changes)?;
        self.store.replace(&trip, expected_version).await
    }

    pub async fn create_trip(&self, mut trip: Trip) -> TripResult<Trip> {
        trip.id = Some(ObjectId::new());
        trip.version = 0;
        trip.created_at = None;
        trip.updated_at = None;
        for stop in trip.stops.iter_mut() {
            stop.trip_id = None;
        }

        let trip = self.normalize(trip, &TripChanges::created())?;
        self.store.insert(&trip).await?;

        log::info!(
            "Created trip {} for owner {} with {} stops",
            trip.id.map(|id| id.to_hex()).unwrap_or_default(),
            trip.owner_id,
            trip.stops.len()
        );
        Ok(trip)
    }

    pub async fn get_trip(&self, id: &ObjectId) -> TripResult<Trip> {
        self.load(id).await
    }

    pub async fn update_trip(&self, id: &ObjectId, update: TripUpdate) -> TripResult<Trip> {
        self.mutate(id, |trip| {
            update.apply(trip);
            Ok(TripChanges::fields())
        })
        .await
    }

    pub async fn delete_trip(&self, id: &ObjectId) -> TripResult<()> {
        if !self.store.delete(id).await? {
            return Err(TripError::not_found("Trip", id.to_hex()));
        }
        log::info!("Deleted trip {}", id);
        Ok(())
    }

    pub async fn list_owner_trips(&self, owner_id: &str) -> TripResult<Vec<Trip>> {
        self.store.list_by_owner(owner_id).await
    }

    pub async fn discover(&self, query: &TripQuery) -> TripResult<Vec<Trip>> {
        let limit = query.effective_limit(self.discover_default_limit);
        self.store.search(query, limit).await
    }

    /// Start a private trip for `owner_id` from a template.
    pub async fn copy_template(&self, id: &ObjectId, owner_id: &str) -> TripResult<Trip> {
        let template = self.load(id).await?;
        if !template.is_template {
            return Err(TripError::validation("isTemplate", "only templates can be copied"));
        }

        let mut copy = template;
        copy.owner_id = owner_id.to_string();
        copy.is_template = false;
        copy.is_public = false;
        copy.visibility = Some(Visibility::Private);
        copy.shared_with.clear();
        copy.rating = None;
        copy.review_count = 0;
        for stop in copy.stops.iter_mut() {
            stop.set_status(StopStatus::Pending);
            stop.actual_arrival = None;
            stop.actual_departure = None;
            stop.created_at = None;
        }
        for route in copy.routes.iter_mut() {
            route.created_at = None;
        }

        let copy = self.create_trip(copy).await?;
        log::info!(
            "Copied template {} into trip {}",
            id,
            copy.id.map(|id| id.to_hex()).unwrap_or_default()
        );
        Ok(copy)
    }

    pub async fn add_stop(&self, id: &ObjectId, stop: Stop) -> TripResult<Trip> {
        self.mutate(id, |trip| {
            trip.stops.push(stop);
            Ok(TripChanges::stops())
        })
        .await
    }

    /// Replace a stop's content. The stop keeps its id, creation time and,
    /// unless the new value names one, its position.
    pub async fn replace_stop(&self, id: &ObjectId, stop_id: i64, mut stop: Stop) -> TripResult<Trip> {
        self.mutate(id, |trip| {
            let existing = trip
                .stop_mut(stop_id)
                .ok_or_else(|| TripError::not_found("Stop", stop_id))?;

            stop.id = Some(stop_id);
            stop.trip_id = existing.trip_id;
            stop.created_at = existing.created_at;
            if stop.order.is_none() {
                stop.order = existing.order;
            }
            *existing = stop;

            Ok(TripChanges::stops_edited([stop_id]))
        })
        .await
    }

    /// Remove a stop along with every route segment that starts or ends at it.
    pub async fn remove_stop(&self, id: &ObjectId, stop_id: i64) -> TripResult<Trip> {
        self.mutate(id, |trip| {
            let position = trip
                .stops
                .iter()
                .position(|s| s.id == Some(stop_id))
                .ok_or_else(|| TripError::not_found("Stop", stop_id))?;
            trip.stops.remove(position);

            let routes_before = trip.routes.len();
            trip.routes.retain(|r| !r.touches(stop_id));
            if trip.routes.len() != routes_before {
                log::debug!(
                    "Dropped {} route segments attached to stop {}",
                    routes_before - trip.routes.len(),
                    stop_id
                );
            }

            Ok(TripChanges::stops().and_routes())
        })
        .await
    }

    pub async fn set_stop_status(
        &self,
        id: &ObjectId,
        stop_id: i64,
        status: StopStatus,
    ) -> TripResult<Trip> {
        self.mutate(id, |trip| {
            trip.stop_mut(stop_id)
                .ok_or_else(|| TripError::not_found("Stop", stop_id))?
                .set_status(status);
            Ok(TripChanges::stops_edited([stop_id]))
        })
        .await
    }

    pub async fn reorder_stops(&self, id: &ObjectId, ordered_ids: &[i64]) -> TripResult<Trip> {
        self.mutate(id, |trip| {
            reorder_stops(trip, ordered_ids)?;
            Ok(TripChanges::stops_edited(ordered_ids.iter().copied()))
        })
        .await
    }

    pub async fn add_route(&self, id: &ObjectId, route: RouteSegment) -> TripResult<Trip> {
        self.mutate(id, |trip| {
            trip.routes.push(route);
            Ok(TripChanges::routes())
        })
        .await
    }

    pub async fn remove_route(&self, id: &ObjectId, route_id: &str) -> TripResult<Trip> {
        self.mutate(id, |trip| {
            let position = trip
                .routes
                .iter()
                .position(|r| r.id.as_deref() == Some(route_id))
                .ok_or_else(|| TripError::not_found("Route", route_id))?;
            trip.routes.remove(position);
            Ok(TripChanges::routes())
        })
        .await
    }

    /// Stats computed from the stored stops and routes.
    pub async fn trip_stats(&self, id: &ObjectId) -> TripResult<TripStats> {
        let trip = self.load(id).await?;
        let mut stats = compute_stats(&trip.stops, &trip.routes);
        stats.difficulty_level = trip.stats.difficulty_level;
        Ok(stats)
    }
}
