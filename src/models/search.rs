use bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::trip::{Trip, TripCategory};

pub const MAX_DISCOVER_LIMIT: u32 = 100;

/// Discovery filter over public trips.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TripQuery {
    pub search: Option<String>,
    pub category: Option<TripCategory>,
    pub tag: Option<String>,
    pub templates_only: Option<bool>,
    pub limit: Option<u32>,
}

impl TripQuery {
    pub fn effective_limit(&self, default_limit: u32) -> u32 {
        self.limit
            .unwrap_or(default_limit)
            .clamp(1, MAX_DISCOVER_LIMIT)
    }

    fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn tag_text(&self) -> Option<String> {
        self.tag
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
    }

    pub fn to_document(&self) -> Document {
        let mut filter = doc! { "isPublic": true };

        if let Some(search_text) = self.search_text() {
            filter.insert(
                "name",
                doc! {
                    "$regex": regex::escape(search_text),
                    "$options": "i"
                },
            );
        }

        if let Some(category) = self.category {
            // Same spelling serde writes into the document.
            if let Ok(value) = bson::to_bson(&category) {
                filter.insert("category", value);
            }
        }

        if let Some(tag) = self.tag_text() {
            filter.insert(
                "tags",
                doc! {
                    "$regex": format!("^{}$", regex::escape(&tag)),
                    "$options": "i"
                },
            );
        }

        if self.templates_only.unwrap_or(false) {
            filter.insert("isTemplate", true);
        }

        filter
    }

    /// In-process equivalent of [`TripQuery::to_document`].
    pub fn matches(&self, trip: &Trip) -> bool {
        if !trip.is_public {
            return false;
        }

        if let Some(search_text) = self.search_text() {
            if !trip
                .name
                .to_lowercase()
                .contains(&search_text.to_lowercase())
            {
                return false;
            }
        }

        if let Some(category) = self.category {
            if trip.category != category {
                return false;
            }
        }

        if let Some(tag) = self.tag_text() {
            if !trip.tags.iter().any(|t| t.to_lowercase() == tag) {
                return false;
            }
        }

        if self.templates_only.unwrap_or(false) && !trip.is_template {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_trip(name: &str) -> Trip {
        let mut trip = Trip::new(name, "owner-1");
        trip.is_public = true;
        trip
    }

    #[test]
    fn test_private_trips_never_match() {
        let trip = Trip::new("Secret weekend", "owner-1");
        assert!(!TripQuery::default().matches(&trip));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let trip = public_trip("Kyoto Temples in Autumn");
        let query = TripQuery {
            search: Some("temples".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&trip));

        let query = TripQuery {
            search: Some("osaka".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&trip));
    }

    #[test]
    fn test_tag_and_category_filters() {
        let mut trip = public_trip("Coast drive");
        trip.category = TripCategory::RoadTrip;
        trip.tags = vec!["Ocean".to_string(), "scenic".to_string()];

        let query = TripQuery {
            category: Some(TripCategory::RoadTrip),
            tag: Some("ocean".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&trip));

        let query = TripQuery {
            category: Some(TripCategory::Food),
            ..Default::default()
        };
        assert!(!query.matches(&trip));
    }

    #[test]
    fn test_templates_only() {
        let mut trip = public_trip("Starter plan");
        let query = TripQuery {
            templates_only: Some(true),
            ..Default::default()
        };
        assert!(!query.matches(&trip));
        trip.is_template = true;
        assert!(query.matches(&trip));
    }

    #[test]
    fn test_document_escapes_search_text() {
        let query = TripQuery {
            search: Some("a.b".to_string()),
            category: Some(TripCategory::RoadTrip),
            ..Default::default()
        };
        let filter = query.to_document();
        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), "a\\.b");
        assert_eq!(filter.get_str("category").unwrap(), "road_trip");
        assert!(filter.get_bool("isPublic").unwrap());
    }

    #[test]
    fn test_limit_is_clamped() {
        let query = TripQuery {
            limit: Some(5000),
            ..Default::default()
        };
        assert_eq!(query.effective_limit(20), MAX_DISCOVER_LIMIT);
        assert_eq!(TripQuery::default().effective_limit(20), 20);
    }
}
