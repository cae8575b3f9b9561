//! Field-level rules for trips, stops and route segments.
//!
//! Every failure names the offending field using a path such as
//! `stops[2].coordinates.lat` so callers can point at the bad input.

use crate::error::{TripError, TripResult};
use crate::models::{
    route::RouteSegment,
    stop::{Coordinates, Stop, StopStatus},
    trip::Trip,
};

pub const TRIP_NAME_MAX_CHARS: usize = 200;
pub const TRIP_DESCRIPTION_MAX_CHARS: usize = 2000;
pub const STOP_NAME_MAX_CHARS: usize = 200;
pub const STOP_DESCRIPTION_MAX_CHARS: usize = 500;
pub const STOP_NOTES_MAX_CHARS: usize = 1000;
pub const MAX_RATING: f64 = 5.0;

pub fn validate_trip(trip: &Trip) -> TripResult<()> {
    validate_text("name", &trip.name, 1, TRIP_NAME_MAX_CHARS)?;
    if let Some(description) = &trip.description {
        validate_text("description", description, 0, TRIP_DESCRIPTION_MAX_CHARS)?;
    }

    if trip.owner_id.trim().is_empty() {
        return Err(TripError::validation("ownerId", "is required"));
    }

    if trip.estimated_duration == Some(0) {
        return Err(TripError::validation("estimatedDuration", "must be at least 1 day"));
    }

    if let (Some(start), Some(end)) = (trip.start_date, trip.end_date) {
        if end < start {
            return Err(TripError::validation("endDate", "must not be before startDate"));
        }
    }

    if let Some(rating) = trip.rating {
        if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
            return Err(TripError::validation("rating", "must be within [0, 5]"));
        }
    }

    for (i, stop) in trip.stops.iter().enumerate() {
        validate_stop(stop, &format!("stops[{}]", i))?;
    }

    for (i, route) in trip.routes.iter().enumerate() {
        validate_route(route, &format!("routes[{}]", i))?;
    }

    Ok(())
}

pub fn validate_stop(stop: &Stop, path: &str) -> TripResult<()> {
    validate_text(&format!("{}.name", path), &stop.name, 1, STOP_NAME_MAX_CHARS)?;
    if let Some(description) = &stop.description {
        validate_text(
            &format!("{}.description", path),
            description,
            0,
            STOP_DESCRIPTION_MAX_CHARS,
        )?;
    }
    if let Some(notes) = &stop.notes {
        validate_text(&format!("{}.notes", path), notes, 0, STOP_NOTES_MAX_CHARS)?;
    }

    validate_coordinates(&format!("{}.coordinates", path), stop.coordinates)?;

    if stop.estimated_duration < 1 {
        return Err(TripError::validation(
            format!("{}.estimatedDuration", path),
            "must be at least 1 minute",
        ));
    }

    if let Some(cost) = stop.cost {
        if !cost.is_finite() || cost < 0.0 {
            return Err(TripError::validation(
                format!("{}.cost", path),
                "must be a non-negative number",
            ));
        }
    }

    if stop.order == Some(0) {
        return Err(TripError::validation(
            format!("{}.order", path),
            "must be at least 1",
        ));
    }

    Ok(())
}

pub fn validate_route(route: &RouteSegment, path: &str) -> TripResult<()> {
    if let Some(id) = &route.id {
        if id.trim().is_empty() {
            return Err(TripError::validation(format!("{}.id", path), "must not be empty"));
        }
    }

    if let Some(distance) = route.distance {
        if !distance.is_finite() || distance < 0.0 {
            return Err(TripError::validation(
                format!("{}.distance", path),
                "must be a non-negative number of meters",
            ));
        }
    }

    if !route.estimated_duration.is_finite() || route.estimated_duration < 0.0 {
        return Err(TripError::validation(
            format!("{}.estimatedDuration", path),
            "must be a non-negative number of seconds",
        ));
    }

    for (i, [lng, lat]) in route.coordinates.iter().enumerate() {
        validate_coordinates(
            &format!("{}.coordinates[{}]", path, i),
            Coordinates::new(*lat, *lng),
        )?;
    }

    Ok(())
}

pub fn validate_coordinates(path: &str, coordinates: Coordinates) -> TripResult<()> {
    if !coordinates.lat.is_finite() || !(-90.0..=90.0).contains(&coordinates.lat) {
        return Err(TripError::validation(
            format!("{}.lat", path),
            "must be within [-90, 90]",
        ));
    }
    if !coordinates.lng.is_finite() || !(-180.0..=180.0).contains(&coordinates.lng) {
        return Err(TripError::validation(
            format!("{}.lng", path),
            "must be within [-180, 180]",
        ));
    }
    Ok(())
}

/// Fold the legacy `isCompleted`/`isSkipped` flags into `status`.
///
/// An explicit non-pending `status` wins over flags that say pending. Flags
/// that are both set, or that name a different terminal state than `status`,
/// are rejected rather than guessed at.
pub fn reconcile_stop_status(stop: &mut Stop, path: &str) -> TripResult<()> {
    if stop.is_completed.is_some() || stop.is_skipped.is_some() {
        let from_flags = StopStatus::from_flags(
            stop.is_completed.unwrap_or(false),
            stop.is_skipped.unwrap_or(false),
        )
        .ok_or_else(|| {
            TripError::validation(
                format!("{}.status", path),
                "isCompleted and isSkipped cannot both be true",
            )
        })?;

        match (stop.status, from_flags) {
            (_, StopStatus::Pending) => {}
            (StopStatus::Pending, flagged) => stop.status = flagged,
            (current, flagged) if current != flagged => {
                return Err(TripError::validation(
                    format!("{}.status", path),
                    "conflicts with isCompleted/isSkipped",
                ));
            }
            _ => {}
        }
    }

    stop.sync_legacy_flags();
    Ok(())
}

fn validate_text(field: &str, value: &str, min_chars: usize, max_chars: usize) -> TripResult<()> {
    let length = value.trim().chars().count();
    if length < min_chars {
        return Err(TripError::validation(field, "is required"));
    }
    if value.chars().count() > max_chars {
        return Err(TripError::validation(
            field,
            format!("must be at most {} characters", max_chars),
        ));
    }
    Ok(())
}
