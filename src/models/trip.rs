use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::route::{RouteSegment, TransportMode};
use super::stop::Stop;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
    Shared,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TripCategory {
    Adventure,
    Cultural,
    Relaxation,
    Business,
    Family,
    Romantic,
    Food,
    Nature,
    Urban,
    RoadTrip,
    #[default]
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Moderate,
    Challenging,
}

/// Aggregate metrics derived from a trip's stops and routes.
///
/// Everything except `difficulty_level` is overwritten on every normalize.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripStats {
    /// meters
    pub total_distance: f64,
    /// minutes
    pub estimated_duration: u64,
    pub stop_count: u32,
    /// minutes
    pub average_stop_duration: f64,
    pub transport_modes: Vec<TransportMode>,
    pub estimated_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<DifficultyLevel>,
}

impl Default for TripStats {
    fn default() -> Self {
        Self {
            total_distance: 0.0,
            estimated_duration: 0,
            stop_count: 0,
            average_stop_duration: 0.0,
            transport_modes: vec![TransportMode::Walking],
            estimated_cost: 0.0,
            difficulty_level: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
    /// Older name for `estimated_duration`, still read by legacy clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub shared_with: Vec<String>,
    #[serde(default)]
    pub category: TripCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub routes: Vec<RouteSegment>,
    #[serde(default)]
    pub stats: TripStats,
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trip {
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            owner_id: owner_id.into(),
            start_date: None,
            end_date: None,
            estimated_duration: None,
            length: None,
            is_public: false,
            is_template: false,
            visibility: None,
            shared_with: Vec::new(),
            category: TripCategory::default(),
            tags: Vec::new(),
            rating: None,
            review_count: 0,
            stops: Vec::new(),
            routes: Vec::new(),
            stats: TripStats::default(),
            version: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn stop(&self, stop_id: i64) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == Some(stop_id))
    }

    pub fn stop_mut(&mut self, stop_id: i64) -> Option<&mut Stop> {
        self.stops.iter_mut().find(|s| s.id == Some(stop_id))
    }
}

/// Caller-writable trip fields. Stops, routes, stats, ownership and
/// timestamps go through their own operations.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub estimated_duration: Option<u32>,
    pub length: Option<u32>,
    pub is_public: Option<bool>,
    pub is_template: Option<bool>,
    pub visibility: Option<Visibility>,
    pub shared_with: Option<Vec<String>>,
    pub category: Option<TripCategory>,
    pub tags: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub difficulty_level: Option<DifficultyLevel>,
}

impl TripUpdate {
    pub fn apply(self, trip: &mut Trip) {
        if let Some(name) = self.name {
            trip.name = name;
        }
        if let Some(description) = self.description {
            trip.description = Some(description);
        }
        if let Some(start_date) = self.start_date {
            trip.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            trip.end_date = Some(end_date);
        }
        if let Some(estimated_duration) = self.estimated_duration {
            trip.estimated_duration = Some(estimated_duration);
        }
        if let Some(length) = self.length {
            trip.length = Some(length);
        }
        // `isPublic` and `visibility` move together when only one is given.
        match (self.is_public, self.visibility) {
            (Some(is_public), Some(visibility)) => {
                trip.is_public = is_public;
                trip.visibility = Some(visibility);
            }
            (Some(is_public), None) => {
                trip.is_public = is_public;
                trip.visibility = match (is_public, trip.visibility) {
                    (true, _) => Some(Visibility::Public),
                    (false, Some(Visibility::Shared)) => Some(Visibility::Shared),
                    (false, _) => Some(Visibility::Private),
                };
            }
            (None, Some(visibility)) => {
                trip.is_public = visibility == Visibility::Public;
                trip.visibility = Some(visibility);
            }
            (None, None) => {}
        }
        if let Some(is_template) = self.is_template {
            trip.is_template = is_template;
        }
        if let Some(shared_with) = self.shared_with {
            trip.shared_with = shared_with;
        }
        if let Some(category) = self.category {
            trip.category = category;
        }
        if let Some(tags) = self.tags {
            trip.tags = tags;
        }
        if let Some(rating) = self.rating {
            trip.rating = Some(rating);
        }
        if let Some(review_count) = self.review_count {
            trip.review_count = review_count;
        }
        if let Some(difficulty_level) = self.difficulty_level {
            trip.stats.difficulty_level = Some(difficulty_level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_trip() -> Trip {
        let mut trip = Trip::new("Rome", "owner-1");
        trip.is_public = true;
        trip.visibility = Some(Visibility::Public);
        trip
    }

    #[test]
    fn test_unpublishing_updates_visibility() {
        let mut trip = public_trip();
        TripUpdate {
            is_public: Some(false),
            ..Default::default()
        }
        .apply(&mut trip);
        assert!(!trip.is_public);
        assert_eq!(trip.visibility, Some(Visibility::Private));
    }

    #[test]
    fn test_visibility_updates_is_public() {
        let mut trip = public_trip();
        TripUpdate {
            visibility: Some(Visibility::Shared),
            ..Default::default()
        }
        .apply(&mut trip);
        assert!(!trip.is_public);
        assert_eq!(trip.visibility, Some(Visibility::Shared));

        TripUpdate {
            is_public: Some(true),
            ..Default::default()
        }
        .apply(&mut trip);
        assert_eq!(trip.visibility, Some(Visibility::Public));
    }
}
