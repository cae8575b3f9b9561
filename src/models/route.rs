use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Walking,
    Cycling,
    Motorcycle,
    Car,
    PublicTransport,
    Boat,
    Flight,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteInstruction {
    pub text: String,
    /// meters
    #[serde(default)]
    pub distance: f64,
    /// seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<String>,
}

/// Path and travel metadata between two stops of the same trip.
///
/// `coordinates` holds `[lng, lat]` pairs in travel order. `distance` is in
/// meters and `estimated_duration` in seconds.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from_stop_id: i64,
    pub to_stop_id: i64,
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub estimated_duration: f64,
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<RouteInstruction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RouteSegment {
    pub fn new(from_stop_id: i64, to_stop_id: i64, transport_mode: TransportMode) -> Self {
        Self {
            id: None,
            from_stop_id,
            to_stop_id,
            coordinates: Vec::new(),
            distance: None,
            estimated_duration: 0.0,
            transport_mode,
            instructions: None,
            elevation: None,
            created_at: None,
        }
    }

    pub fn touches(&self, stop_id: i64) -> bool {
        self.from_stop_id == stop_id || self.to_stop_id == stop_id
    }
}
