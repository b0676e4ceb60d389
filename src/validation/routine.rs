//! Routine rule validation.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{
    as_number, as_object, field, optional_number, optional_text, record_id, Validated,
    ValidationError,
};
use crate::models::{RoutineRule, RoutineSport};
use crate::time_utils::{epoch_millis, format_iso_millis, parse_time_local};

pub fn validate_routine(
    input: &Value,
    existing: Option<&RoutineRule>,
) -> Result<Validated<RoutineRule>, ValidationError> {
    validate_routine_at(input, existing, Utc::now())
}

/// Validate a routine rule, creating it or updating `existing`.
///
/// `createdAt` survives updates and `updatedAt` is always `now`, which is
/// also the sort key.
pub fn validate_routine_at(
    input: &Value,
    existing: Option<&RoutineRule>,
    now: DateTime<Utc>,
) -> Result<Validated<RoutineRule>, ValidationError> {
    let obj = as_object(input)?;

    let id = match existing {
        Some(rule) => rule.id.clone(),
        None => record_id(field(obj, "id"))?,
    };

    let sport = match field(obj, "sport") {
        Some(raw) => raw.as_str().and_then(RoutineSport::parse),
        None => existing.map(|rule| rule.sport),
    }
    .ok_or(ValidationError::InvalidSport)?;

    let weekday = match field(obj, "weekday") {
        Some(raw) => as_number(raw)
            .filter(|n| n.fract() == 0.0 && (1.0..=7.0).contains(n))
            .map(|n| n as u8),
        None => existing.map(|rule| rule.weekday),
    }
    .ok_or(ValidationError::InvalidWeekday)?;

    let time_local = match field(obj, "timeLocal") {
        Some(raw) => raw
            .as_str()
            .filter(|s| parse_time_local(s).is_some())
            .map(str::to_string),
        None => existing.map(|rule| rule.time_local.clone()),
    }
    .ok_or(ValidationError::InvalidTimeLocal)?;

    let duration_min = optional_number(obj, "durationMin", ValidationError::InvalidDurationMin, |n| {
        n > 0.0
    })?
    .or_else(|| existing.and_then(|rule| rule.duration_min));

    let notes = optional_text(obj, "notes", ValidationError::InvalidNotes)?
        .or_existing(existing.and_then(|rule| rule.notes.as_ref()));

    let is_enabled = match field(obj, "isEnabled") {
        Some(Value::Bool(enabled)) => *enabled,
        Some(_) => return Err(ValidationError::InvalidIsEnabled),
        None => existing.map_or(true, |rule| rule.is_enabled),
    };

    let updated_at = format_iso_millis(now);
    let created_at = existing.map_or_else(|| updated_at.clone(), |rule| rule.created_at.clone());

    Ok(Validated {
        value: RoutineRule {
            id,
            sport,
            weekday,
            time_local,
            duration_min,
            notes,
            is_enabled,
            created_at,
            updated_at,
        },
        sort_key: epoch_millis(now),
    })
}
