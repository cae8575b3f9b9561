use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::IndexOptions,
    Client, Collection, Database, IndexModel,
};
use std::sync::Arc;

use crate::error::{TripError, TripResult};
use crate::models::{search::TripQuery, trip::Trip};

/// Storage for whole trip documents.
///
/// `replace` is a compare-and-swap on `version`: it only writes when the
/// stored version still equals `expected_version`, and stores the trip with
/// `expected_version + 1`.
pub trait TripStore {
    async fn insert(&self, trip: &Trip) -> TripResult<()>;
    async fn find(&self, id: &ObjectId) -> TripResult<Option<Trip>>;
    async fn replace(&self, trip: &Trip, expected_version: u64) -> TripResult<Trip>;
    async fn delete(&self, id: &ObjectId) -> TripResult<bool>;
    async fn list_by_owner(&self, owner_id: &str) -> TripResult<Vec<Trip>>;
    async fn search(&self, query: &TripQuery, limit: u32) -> TripResult<Vec<Trip>>;
    async fn ping(&self) -> TripResult<()>;
}

/// Matches the trip only at `expected_version`. Records written before
/// versioning have no `version` field and load as version 0.
fn version_filter(id: ObjectId, expected_version: u64) -> Document {
    if expected_version == 0 {
        doc! {
            "_id": id,
            "$or": [
                { "version": 0_i64 },
                { "version": { "$exists": false } },
            ],
        }
    } else {
        doc! { "_id": id, "version": expected_version as i64 }
    }
}

pub struct MongoTripStore {
    database: Database,
    collection: Collection<Trip>,
}

impl MongoTripStore {
    pub fn new(client: Arc<Client>, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        Self {
            collection: database.collection(collection),
            database,
        }
    }

    /// Indexes backing owner listings and discovery.
    pub async fn ensure_indexes(&self) -> TripResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "ownerId": 1, "createdAt": -1 })
                .options(IndexOptions::builder().name("owner_created".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "isPublic": 1, "category": 1, "rating": -1 })
                .options(IndexOptions::builder().name("discover".to_string()).build())
                .build(),
        ];
        self.collection.create_indexes(indexes).await?;
        Ok(())
    }
}

impl TripStore for MongoTripStore {
    async fn insert(&self, trip: &Trip) -> TripResult<()> {
        self.collection.insert_one(trip).await?;
        Ok(())
    }

    async fn find(&self, id: &ObjectId) -> TripResult<Option<Trip>> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn replace(&self, trip: &Trip, expected_version: u64) -> TripResult<Trip> {
        let id = trip
            .id
            .ok_or_else(|| TripError::validation("_id", "is required to replace a trip"))?;

        let mut next = trip.clone();
        next.version = expected_version + 1;

        let result = self
            .collection
            .replace_one(version_filter(id, expected_version), &next)
            .await?;

        if result.matched_count == 0 {
            return match self.find(&id).await? {
                Some(_) => Err(TripError::Conflict {
                    id: id.to_hex(),
                    expected: expected_version,
                }),
                None => Err(TripError::not_found("Trip", id.to_hex())),
            };
        }

        Ok(next)
    }

    async fn delete(&self, id: &ObjectId) -> TripResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_by_owner(&self, owner_id: &str) -> TripResult<Vec<Trip>> {
        let cursor = self
            .collection
            .find(doc! { "ownerId": owner_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn search(&self, query: &TripQuery, limit: u32) -> TripResult<Vec<Trip>> {
        let filter = query.to_document();
        log::debug!("Trip discovery filter: {:?}", filter);

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "rating": -1, "createdAt": -1 })
            .limit(i64::from(limit))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn ping(&self) -> TripResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
