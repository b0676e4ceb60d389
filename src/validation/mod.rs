// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Validation of untyped request bodies into domain records.
//!
//! Every validator is a pure function over a `serde_json::Value`. Fields are
//! checked in a fixed order and the first failure is reported, so a given
//! malformed input always yields the same [`ValidationError`].
//!
//! Coercion rules shared by all validators:
//! - numbers may arrive as JSON numbers or numeric strings, and must be finite
//! - datetimes must parse to an instant and are normalized to UTC millis
//! - strings are trimmed; an optional string that is empty after trimming is
//!   treated as absent
//! - `null` is the same as a missing field

mod exercise;
mod goal;
mod plan;
mod routine;
mod workout;

pub use goal::validate_goal;
pub use plan::{validate_plan, validate_plan_at};
pub use routine::{validate_routine, validate_routine_at};
pub use workout::validate_workout;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::time_utils::parse_instant;

/// Minimum length of caller-supplied record ids.
pub const MIN_ID_LEN: usize = 8;

/// A validated record together with its sorted-store score.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    /// Milliseconds since the epoch
    pub sort_key: i64,
}

/// Machine-stable rejection reasons. The `Display` text is returned to
/// clients verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Invalid id")]
    InvalidId,
    #[error("Invalid startedAt")]
    InvalidStartedAt,
    #[error("Invalid plannedFor")]
    InvalidPlannedFor,
    #[error("Invalid sport")]
    InvalidSport,
    #[error("Invalid durationMin")]
    InvalidDurationMin,
    #[error("Invalid rpe")]
    InvalidRpe,
    #[error("Invalid notes")]
    InvalidNotes,
    #[error("Invalid details.distanceKm")]
    InvalidDistanceKm,
    #[error("Invalid details.paceSecPerKm")]
    InvalidPaceSecPerKm,
    #[error("Invalid details.distanceM")]
    InvalidDistanceM,
    #[error("Invalid details.poolLengthM")]
    InvalidPoolLengthM,
    #[error("Invalid details.exercises")]
    InvalidDetailsExercises,
    #[error("Invalid exercises")]
    InvalidExercises,
    #[error("Invalid exercise")]
    InvalidExercise,
    #[error("Invalid exercise.name")]
    InvalidExerciseName,
    #[error("Invalid exercise.sets")]
    InvalidExerciseSets,
    #[error("Invalid set")]
    InvalidSet,
    #[error("Set needs reps or durationSec")]
    SetNeedsRepsOrDuration,
    #[error("Invalid set.reps")]
    InvalidSetReps,
    #[error("Invalid set.weightKg")]
    InvalidSetWeightKg,
    #[error("Invalid set.durationSec")]
    InvalidSetDurationSec,
    #[error("Invalid status")]
    InvalidStatus,
    #[error("Invalid statusUpdatedAt")]
    InvalidStatusUpdatedAt,
    #[error("Invalid source")]
    InvalidSource,
    #[error("Invalid routineId")]
    InvalidRoutineId,
    #[error("Invalid completedWorkoutId")]
    InvalidCompletedWorkoutId,
    #[error("Invalid weekday")]
    InvalidWeekday,
    #[error("Invalid timeLocal")]
    InvalidTimeLocal,
    #[error("Invalid isEnabled")]
    InvalidIsEnabled,
    #[error("Invalid text")]
    InvalidText,
    #[error("Goal is empty")]
    EmptyGoal,
}

pub(crate) type Object = Map<String, Value>;

/// Outcome of reading an optional free-text field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TextField {
    Absent,
    /// Present but empty after trimming
    Cleared,
    Text(String),
}

impl TextField {
    /// Resolve against the value currently stored.
    pub(crate) fn or_existing(self, existing: Option<&String>) -> Option<String> {
        match self {
            TextField::Absent => existing.cloned(),
            TextField::Cleared => None,
            TextField::Text(text) => Some(text),
        }
    }
}

pub(crate) fn as_object(input: &Value) -> Result<&Object, ValidationError> {
    input.as_object().ok_or(ValidationError::InvalidJson)
}

/// Field lookup where `null` counts as missing.
pub(crate) fn field<'a>(obj: &'a Object, name: &str) -> Option<&'a Value> {
    obj.get(name).filter(|v| !v.is_null())
}

/// Coerce a JSON number or numeric string to a finite `f64`.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Read an optional number that must satisfy `accept`.
pub(crate) fn optional_number(
    obj: &Object,
    name: &str,
    error: ValidationError,
    accept: impl Fn(f64) -> bool,
) -> Result<Option<f64>, ValidationError> {
    match field(obj, name) {
        None => Ok(None),
        Some(raw) => match as_number(raw) {
            Some(n) if accept(n) => Ok(Some(n)),
            _ => Err(error),
        },
    }
}

pub(crate) fn as_instant(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_instant)
}

/// A caller-supplied id: a string of at least [`MIN_ID_LEN`] characters.
pub(crate) fn record_id(value: Option<&Value>) -> Result<String, ValidationError> {
    match value.and_then(Value::as_str) {
        Some(id) if id.chars().count() >= MIN_ID_LEN => Ok(id.to_string()),
        _ => Err(ValidationError::InvalidId),
    }
}

pub(crate) fn optional_text(
    obj: &Object,
    name: &str,
    error: ValidationError,
) -> Result<TextField, ValidationError> {
    match field(obj, name) {
        None => Ok(TextField::Absent),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(TextField::Cleared)
            } else {
                Ok(TextField::Text(trimmed.to_string()))
            }
        }
        Some(_) => Err(error),
    }
}
