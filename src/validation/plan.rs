//! Strength plan validation.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::exercise::validate_exercises;
use super::{
    as_instant, as_object, field, optional_number, optional_text, record_id, Validated,
    ValidationError, MIN_ID_LEN,
};
use crate::models::{PlanSource, PlanStatus, StrengthPlan};
use crate::time_utils::{epoch_millis, format_iso_millis, parse_instant};

/// Validate a plan against the current time.
pub fn validate_plan(
    input: &Value,
    existing: Option<&StrengthPlan>,
) -> Result<Validated<StrengthPlan>, ValidationError> {
    validate_plan_at(input, existing, Utc::now())
}

/// Validate a plan, creating it or updating `existing`.
///
/// With `existing`, the id is inherited and any absent field keeps its
/// stored value. The status timestamp is refreshed whenever the status
/// changes unless the input supplies one. The sort key is `plannedFor`.
///
/// Check order: id, plannedFor, durationMin, notes, exercises, status,
/// statusUpdatedAt, source, routineId, completedWorkoutId.
pub fn validate_plan_at(
    input: &Value,
    existing: Option<&StrengthPlan>,
    now: DateTime<Utc>,
) -> Result<Validated<StrengthPlan>, ValidationError> {
    let obj = as_object(input)?;

    let id = match existing {
        Some(plan) => plan.id.clone(),
        None => record_id(field(obj, "id"))?,
    };

    let planned_for = match field(obj, "plannedFor") {
        Some(raw) => as_instant(raw).ok_or(ValidationError::InvalidPlannedFor)?,
        None => existing
            .and_then(|plan| parse_instant(&plan.planned_for))
            .ok_or(ValidationError::InvalidPlannedFor)?,
    };

    let duration_min = optional_number(obj, "durationMin", ValidationError::InvalidDurationMin, |n| {
        n > 0.0
    })?
    .or_else(|| existing.and_then(|plan| plan.duration_min));

    let notes = optional_text(obj, "notes", ValidationError::InvalidNotes)?
        .or_existing(existing.and_then(|plan| plan.notes.as_ref()));

    let exercises = match (field(obj, "exercises"), existing) {
        (None, Some(plan)) => plan.exercises.clone(),
        (raw, _) => validate_exercises(raw, ValidationError::InvalidExercises)?,
    };

    let status = match field(obj, "status") {
        Some(raw) => raw
            .as_str()
            .and_then(PlanStatus::parse)
            .ok_or(ValidationError::InvalidStatus)?,
        None => existing.map_or(PlanStatus::Planned, |plan| plan.status),
    };

    let status_updated_at = match field(obj, "statusUpdatedAt") {
        Some(raw) => format_iso_millis(
            as_instant(raw).ok_or(ValidationError::InvalidStatusUpdatedAt)?,
        ),
        None => match existing {
            Some(plan) if plan.status == status => plan.status_updated_at.clone(),
            _ => format_iso_millis(now),
        },
    };

    let source = match field(obj, "source") {
        Some(raw) => raw
            .as_str()
            .and_then(PlanSource::parse)
            .ok_or(ValidationError::InvalidSource)?,
        None => existing.map_or(PlanSource::Manual, |plan| plan.source),
    };

    let routine_id = match field(obj, "routineId") {
        Some(raw) => match raw.as_str() {
            Some(rid) if rid.chars().count() >= MIN_ID_LEN => Some(rid.to_string()),
            _ => return Err(ValidationError::InvalidRoutineId),
        },
        None => existing.and_then(|plan| plan.routine_id.clone()),
    };
    if (source == PlanSource::Routine) != routine_id.is_some() {
        return Err(ValidationError::InvalidRoutineId);
    }

    let completed_workout_id = match field(obj, "completedWorkoutId") {
        Some(raw) => match raw.as_str().map(str::trim) {
            Some(wid) if !wid.is_empty() => Some(wid.to_string()),
            _ => return Err(ValidationError::InvalidCompletedWorkoutId),
        },
        None => existing.and_then(|plan| plan.completed_workout_id.clone()),
    };

    Ok(Validated {
        value: StrengthPlan {
            id,
            planned_for: format_iso_millis(planned_for),
            duration_min,
            notes,
            exercises,
            status,
            status_updated_at,
            source,
            routine_id,
            completed_workout_id,
        },
        sort_key: epoch_millis(planned_for),
    })
}
