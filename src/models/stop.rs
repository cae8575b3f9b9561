use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STOP_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Attraction,
    Food,
    Accommodation,
    Transport,
    Shopping,
    Nature,
    Culture,
    Activity,
    Rest,
    #[default]
    Custom,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Where a stop is in its visit. Completed and skipped are both terminal for
/// planning purposes, but the caller may reset either back to pending.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

impl StopStatus {
    /// Builds a status from the legacy pair of booleans. Both set is
    /// ambiguous and returns `None`.
    pub fn from_flags(is_completed: bool, is_skipped: bool) -> Option<Self> {
        match (is_completed, is_skipped) {
            (false, false) => Some(StopStatus::Pending),
            (true, false) => Some(StopStatus::Completed),
            (false, true) => Some(StopStatus::Skipped),
            (true, true) => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StopStatus::Completed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StopStatus::Skipped)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub planned_arrival: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_departure: Option<DateTime<Utc>>,
    #[serde(default = "default_stop_duration")]
    pub estimated_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_arrival: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_departure: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_type: StopType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default)]
    pub status: StopStatus,
    // Legacy flags. Written alongside `status` for older readers, and folded
    // back into `status` when a record arrives carrying them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_skipped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_stop_duration() -> u32 {
    DEFAULT_STOP_DURATION_MINUTES
}

impl Stop {
    /// A pending stop with every optional field empty.
    pub fn new(name: impl Into<String>, coordinates: Coordinates, planned_arrival: DateTime<Utc>) -> Self {
        Self {
            id: None,
            trip_id: None,
            name: name.into(),
            description: None,
            coordinates,
            address: None,
            place_id: None,
            planned_arrival,
            planned_departure: None,
            estimated_duration: DEFAULT_STOP_DURATION_MINUTES,
            actual_arrival: None,
            actual_departure: None,
            stop_type: StopType::default(),
            priority: Priority::default(),
            cost: None,
            notes: None,
            photos: Vec::new(),
            order: None,
            status: StopStatus::Pending,
            is_completed: None,
            is_skipped: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the status and rewrites the legacy flags to agree with it.
    pub fn set_status(&mut self, status: StopStatus) {
        self.status = status;
        self.sync_legacy_flags();
    }

    pub(crate) fn sync_legacy_flags(&mut self) {
        self.is_completed = Some(self.status.is_completed());
        self.is_skipped = Some(self.status.is_skipped());
    }
}
