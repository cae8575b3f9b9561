//! HashMap-backed trip store for tests and local development.

use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::trip_store::TripStore;
use crate::error::{TripError, TripResult};
use crate::models::{search::TripQuery, trip::Trip};

#[derive(Clone, Default)]
pub struct InMemoryTripStore {
    trips: Arc<RwLock<HashMap<ObjectId, Trip>>>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.trips.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trips.read().await.is_empty()
    }
}

impl TripStore for InMemoryTripStore {
    async fn insert(&self, trip: &Trip) -> TripResult<()> {
        let id = trip
            .id
            .ok_or_else(|| TripError::validation("_id", "is required to insert a trip"))?;

        let mut trips = self.trips.write().await;
        if trips.contains_key(&id) {
            return Err(TripError::Conflict {
                id: id.to_hex(),
                expected: trip.version,
            });
        }
        trips.insert(id, trip.clone());
        Ok(())
    }

    async fn find(&self, id: &ObjectId) -> TripResult<Option<Trip>> {
        Ok(self.trips.read().await.get(id).cloned())
    }

    async fn replace(&self, trip: &Trip, expected_version: u64) -> TripResult<Trip> {
        let id = trip
            .id
            .ok_or_else(|| TripError::validation("_id", "is required to replace a trip"))?;

        let mut trips = self.trips.write().await;
        let stored = trips
            .get_mut(&id)
            .ok_or_else(|| TripError::not_found("Trip", id.to_hex()))?;

        if stored.version != expected_version {
            return Err(TripError::Conflict {
                id: id.to_hex(),
                expected: expected_version,
            });
        }

        let mut next = trip.clone();
        next.version = expected_version + 1;
        *stored = next.clone();
        Ok(next)
    }

    async fn delete(&self, id: &ObjectId) -> TripResult<bool> {
        Ok(self.trips.write().await.remove(id).is_some())
    }

    async fn list_by_owner(&self, owner_id: &str) -> TripResult<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .trips
            .read()
            .await
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn search(&self, query: &TripQuery, limit: u32) -> TripResult<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .trips
            .read()
            .await
            .values()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();

        trips.sort_by(|a, b| {
            // Unrated trips sort after rated ones, like a descending Mongo sort.
            b.rating
                .unwrap_or(-1.0)
                .partial_cmp(&a.rating.unwrap_or(-1.0))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        trips.truncate(limit as usize);
        Ok(trips)
    }

    async fn ping(&self) -> TripResult<()> {
        Ok(())
    }
}
