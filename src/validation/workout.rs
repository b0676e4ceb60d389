//! Workout validation.

use serde_json::Value;

use super::exercise::validate_exercises;
use super::{
    as_instant, as_number, as_object, field, optional_number, optional_text, record_id,
    Object, TextField, Validated, ValidationError,
};
use crate::models::{
    RunDetails, Sport, StrengthDetails, SwimDetails, Workout, WorkoutDetails,
};
use crate::time_utils::{epoch_millis, format_iso_millis};

const POOL_LENGTHS_M: [f64; 2] = [25.0, 50.0];

/// Validate a new workout. The sort key is `startedAt`.
///
/// Check order: id, startedAt, sport, durationMin, rpe, notes, details.
pub fn validate_workout(input: &Value) -> Result<Validated<Workout>, ValidationError> {
    let obj = as_object(input)?;

    let id = record_id(field(obj, "id"))?;

    let started_at = field(obj, "startedAt")
        .and_then(as_instant)
        .ok_or(ValidationError::InvalidStartedAt)?;

    let sport = field(obj, "sport")
        .and_then(Value::as_str)
        .and_then(Sport::parse)
        .ok_or(ValidationError::InvalidSport)?;

    let duration_min = match field(obj, "durationMin").and_then(as_number) {
        Some(n) if n > 0.0 => n,
        _ => return Err(ValidationError::InvalidDurationMin),
    };

    let rpe = optional_number(obj, "rpe", ValidationError::InvalidRpe, |n| {
        (1.0..=10.0).contains(&n)
    })?;

    let notes = match optional_text(obj, "notes", ValidationError::InvalidNotes)? {
        TextField::Text(text) => Some(text),
        TextField::Absent | TextField::Cleared => None,
    };

    let details = validate_details(sport, field(obj, "details"))?;

    Ok(Validated {
        value: Workout {
            id,
            started_at: format_iso_millis(started_at),
            details,
            duration_min: Some(duration_min),
            rpe,
            notes,
        },
        sort_key: epoch_millis(started_at),
    })
}

fn validate_details(sport: Sport, raw: Option<&Value>) -> Result<WorkoutDetails, ValidationError> {
    let empty = Object::new();
    let obj = raw.and_then(Value::as_object).unwrap_or(&empty);

    match sport {
        Sport::Run | Sport::LaserRun => {
            let run = validate_run(obj)?;
            Ok(if sport == Sport::Run {
                WorkoutDetails::Run(run)
            } else {
                WorkoutDetails::LaserRun(run)
            })
        }
        Sport::Swim => {
            let distance_m = match field(obj, "distanceM").and_then(as_number) {
                Some(n) if n > 0.0 => n,
                _ => return Err(ValidationError::InvalidDistanceM),
            };
            let pool_length_m = optional_number(
                obj,
                "poolLengthM",
                ValidationError::InvalidPoolLengthM,
                |n| POOL_LENGTHS_M.contains(&n),
            )?;
            Ok(WorkoutDetails::Swim(SwimDetails {
                distance_m,
                pool_length_m: pool_length_m.map(|n| n as u32),
            }))
        }
        Sport::Strength => {
            let exercises = validate_exercises(
                field(obj, "exercises"),
                ValidationError::InvalidDetailsExercises,
            )?;
            Ok(WorkoutDetails::Strength(StrengthDetails { exercises }))
        }
    }
}

fn validate_run(obj: &Object) -> Result<RunDetails, ValidationError> {
    let distance_km = match field(obj, "distanceKm").and_then(as_number) {
        Some(n) if n > 0.0 => n,
        _ => return Err(ValidationError::InvalidDistanceKm),
    };
    let pace_sec_per_km = optional_number(
        obj,
        "paceSecPerKm",
        ValidationError::InvalidPaceSecPerKm,
        |n| n > 0.0,
    )?;

    Ok(RunDetails {
        distance_km,
        pace_sec_per_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base(sport: &str, details: Value) -> Value {
        json!({
            "id": "wk-20250310",
            "startedAt": "2025-03-10T07:30:00Z",
            "sport": sport,
            "durationMin": 40,
            "details": details,
        })
    }

    fn with(mut input: Value, key: &str, value: Value) -> Value {
        input.as_object_mut().unwrap().insert(key.to_string(), value);
        input
    }

    #[test]
    fn test_valid_run() {
        let validated = validate_workout(&base(
            "run",
            json!({"distanceKm": "10.5", "paceSecPerKm": 330}),
        ))
        .unwrap();

        assert_eq!(validated.sort_key, 1_741_591_800_000);
        assert_eq!(validated.value.started_at, "2025-03-10T07:30:00.000Z");
        assert_eq!(validated.value.duration_min, Some(40.0));
        assert_eq!(
            validated.value.details,
            WorkoutDetails::Run(RunDetails {
                distance_km: 10.5,
                pace_sec_per_km: Some(330.0),
            })
        );
    }

    #[test]
    fn test_swim_rejects_odd_pool_length() {
        let input = base("swim", json!({"distanceM": 1000, "poolLengthM": 33}));
        assert_eq!(
            validate_workout(&input).unwrap_err(),
            ValidationError::InvalidPoolLengthM
        );

        let input = base("swim", json!({"distanceM": 1000, "poolLengthM": 50}));
        match validate_workout(&input).unwrap().value.details {
            WorkoutDetails::Swim(swim) => assert_eq!(swim.pool_length_m, Some(50)),
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_strength_needs_exercises() {
        let input = base("strength", json!({}));
        assert_eq!(
            validate_workout(&input).unwrap_err(),
            ValidationError::InvalidDetailsExercises
        );

        let input = base(
            "strength",
            json!({"exercises": [{"name": "Bench", "sets": [{"weightKg": -1}]}]}),
        );
        assert_eq!(
            validate_workout(&input).unwrap_err(),
            ValidationError::SetNeedsRepsOrDuration
        );
    }

    #[test]
    fn test_field_order() {
        // Everything is wrong: the id is reported first.
        let input = json!({"id": "short", "startedAt": "nope", "sport": "golf"});
        assert_eq!(validate_workout(&input).unwrap_err(), ValidationError::InvalidId);

        let input = with(base("golf", json!({})), "durationMin", json!(-1));
        assert_eq!(validate_workout(&input).unwrap_err(), ValidationError::InvalidSport);

        let input = with(base("run", json!({})), "durationMin", json!(0));
        assert_eq!(
            validate_workout(&input).unwrap_err(),
            ValidationError::InvalidDurationMin
        );

        let input = with(base("run", json!({})), "rpe", json!(11));
        assert_eq!(validate_workout(&input).unwrap_err(), ValidationError::InvalidRpe);

        let input = with(base("run", json!({})), "notes", json!(5));
        assert_eq!(validate_workout(&input).unwrap_err(), ValidationError::InvalidNotes);

        let input = base("run", json!({"distanceKm": 0}));
        assert_eq!(
            validate_workout(&input).unwrap_err(),
            ValidationError::InvalidDistanceKm
        );
    }

    #[test]
    fn test_missing_duration_is_rejected() {
        let mut input = base("run", json!({"distanceKm": 5}));
        input.as_object_mut().unwrap().remove("durationMin");
        assert_eq!(
            validate_workout(&input).unwrap_err(),
            ValidationError::InvalidDurationMin
        );
    }

    #[test]
    fn test_blank_notes_dropped() {
        let input = with(base("run", json!({"distanceKm": 5})), "notes", json!("   "));
        assert_eq!(validate_workout(&input).unwrap().value.notes, None);

        let input = with(base("run", json!({"distanceKm": 5})), "notes", json!(" easy "));
        assert_eq!(
            validate_workout(&input).unwrap().value.notes.as_deref(),
            Some("easy")
        );
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(
            validate_workout(&json!([1, 2])).unwrap_err(),
            ValidationError::InvalidJson
        );
    }
}
