//! Exercise lists shared by strength workouts and plans.

use serde_json::Value;

use super::{as_object, field, optional_number, Object, ValidationError};
use crate::models::{Exercise, StrengthSet};

/// Validate a non-empty exercise list. `list_error` is reported when the
/// value is not an array or is empty.
pub(crate) fn validate_exercises(
    raw: Option<&Value>,
    list_error: ValidationError,
) -> Result<Vec<Exercise>, ValidationError> {
    let items = match raw.and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items,
        _ => return Err(list_error),
    };

    items.iter().map(validate_exercise).collect()
}

fn validate_exercise(raw: &Value) -> Result<Exercise, ValidationError> {
    let obj = as_object(raw).map_err(|_| ValidationError::InvalidExercise)?;

    let name = match field(obj, "name").and_then(Value::as_str).map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(ValidationError::InvalidExerciseName),
    };

    let sets = match field(obj, "sets").and_then(Value::as_array) {
        Some(sets) if !sets.is_empty() => sets,
        _ => return Err(ValidationError::InvalidExerciseSets),
    };

    let sets = sets
        .iter()
        .map(validate_set)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Exercise { name, sets })
}

fn validate_set(raw: &Value) -> Result<StrengthSet, ValidationError> {
    let obj: &Object = as_object(raw).map_err(|_| ValidationError::InvalidSet)?;

    // Presence is checked before any range so `{weightKg: -1}` reports the
    // missing reps/duration rather than the weight.
    if field(obj, "reps").is_none() && field(obj, "durationSec").is_none() {
        return Err(ValidationError::SetNeedsRepsOrDuration);
    }

    let reps = optional_number(obj, "reps", ValidationError::InvalidSetReps, |n| n >= 1.0)?;
    let weight_kg = optional_number(obj, "weightKg", ValidationError::InvalidSetWeightKg, |n| {
        n >= 0.0
    })?;
    let duration_sec = optional_number(
        obj,
        "durationSec",
        ValidationError::InvalidSetDurationSec,
        |n| n >= 1.0,
    )?;

    Ok(StrengthSet {
        reps,
        weight_kg,
        duration_sec,
    })
}
