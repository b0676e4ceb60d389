// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strength plan lifecycle.
//!
//! A plan starts `planned` and ends `done` or `canceled`. Completing a plan
//! emits a strength workout built from the plan; doing it again is a no-op.
//! Deleting removes the record whatever its status.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::db::{Collection, Journal, Stored};
use crate::error::{AppError, Result};
use crate::models::{
    PlanStatus, StrengthDetails, StrengthPlan, Workout, WorkoutDetails,
};
use crate::time_utils::{epoch_millis, format_iso_millis, parse_instant};
use crate::validation::{record_id, validate_plan_at};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Complete,
    Cancel,
    Delete,
}

impl FromStr for PlanAction {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "complete" => Ok(PlanAction::Complete),
            "cancel" => Ok(PlanAction::Cancel),
            "delete" => Ok(PlanAction::Delete),
            _ => Err(AppError::BadRequest("Invalid action".to_string())),
        }
    }
}

/// What an action does to a plan in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Return the plan as stored
    Unchanged,
    MarkCanceled,
    MarkDone,
    Remove,
}

/// Pure transition table.
pub fn plan_transition(status: PlanStatus, action: PlanAction) -> Transition {
    match (action, status) {
        (PlanAction::Delete, _) => Transition::Remove,
        (_, PlanStatus::Done) => Transition::Unchanged,
        (PlanAction::Cancel, _) => Transition::MarkCanceled,
        (PlanAction::Complete, _) => Transition::MarkDone,
    }
}

/// Result of applying an action.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct ActionOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<StrengthPlan>,
    /// Only set when this call completed the plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout: Option<Workout>,
}

/// Build the workout recorded when `plan` is completed.
pub fn workout_from_plan(plan: &StrengthPlan) -> Workout {
    Workout {
        id: plan
            .completed_workout_id
            .clone()
            .unwrap_or_else(|| plan.id.clone()),
        started_at: plan.planned_for.clone(),
        details: WorkoutDetails::Strength(StrengthDetails {
            exercises: plan.exercises.clone(),
        }),
        duration_min: plan.duration_min,
        rpe: None,
        notes: plan.notes.clone(),
    }
}

pub(crate) fn plan_score(plan: &StrengthPlan) -> Result<i64> {
    parse_instant(&plan.planned_for)
        .map(epoch_millis)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Stored plan has no valid plannedFor")))
}

async fn swap_plan(
    journal: &Journal,
    old: &Stored<StrengthPlan>,
    new: &StrengthPlan,
) -> Result<()> {
    if journal
        .replace(Collection::Plans, old, plan_score(new)?, new)
        .await?
    {
        Ok(())
    } else {
        Err(AppError::Conflict(
            "Plan was modified concurrently".to_string(),
        ))
    }
}

/// Create a new plan. Status fields from the input are ignored.
pub async fn create_plan(journal: &Journal, input: &Value, now: DateTime<Utc>) -> Result<StrengthPlan> {
    let mut input = input.as_object().cloned().ok_or_else(AppError::invalid_json)?;
    input.insert("status".to_string(), Value::from("planned"));
    input.remove("statusUpdatedAt");
    input.remove("completedWorkoutId");

    let validated = validate_plan_at(&Value::Object(input), None, now)?;
    let plan = validated.value;

    if journal
        .find::<StrengthPlan>(Collection::Plans, &plan.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Plan already exists".to_string()));
    }

    journal
        .insert(Collection::Plans, validated.sort_key, &plan)
        .await?;

    tracing::info!(plan_id = %plan.id, source = ?plan.source, "Plan created");
    Ok(plan)
}

/// Edit a plan that is not yet done.
pub async fn update_plan(journal: &Journal, input: &Value, now: DateTime<Utc>) -> Result<StrengthPlan> {
    let obj = input.as_object().ok_or_else(AppError::invalid_json)?;
    let id = record_id(obj.get("id"))?;

    let existing = journal
        .find::<StrengthPlan>(Collection::Plans, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))?;

    if existing.value.is_done() {
        return Err(AppError::Conflict("Plan already done".to_string()));
    }

    let validated = validate_plan_at(input, Some(&existing.value), now)?;
    swap_plan(journal, &existing, &validated.value).await?;

    tracing::info!(plan_id = %id, "Plan updated");
    Ok(validated.value)
}

/// Newest-first plans, skipping records that no longer decode.
pub async fn list_plans(journal: &Journal, limit: usize) -> Result<Vec<StrengthPlan>> {
    journal.list(Collection::Plans, limit).await
}

/// Apply `action` to the plan `id`.
pub async fn apply_action(
    journal: &Journal,
    id: &str,
    action: PlanAction,
    now: DateTime<Utc>,
) -> Result<ActionOutcome> {
    let stored = journal
        .find::<StrengthPlan>(Collection::Plans, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))?;

    match plan_transition(stored.value.status, action) {
        Transition::Remove => {
            journal.remove(Collection::Plans, &stored).await?;
            tracing::info!(plan_id = id, "Plan deleted");
            Ok(ActionOutcome::default())
        }
        Transition::Unchanged => {
            tracing::debug!(plan_id = id, ?action, "Plan already done, nothing to do");
            Ok(ActionOutcome {
                plan: Some(stored.value),
                workout: None,
            })
        }
        Transition::MarkCanceled => {
            let updated = StrengthPlan {
                status: PlanStatus::Canceled,
                status_updated_at: format_iso_millis(now),
                ..stored.value.clone()
            };
            swap_plan(journal, &stored, &updated).await?;

            tracing::info!(plan_id = id, "Plan canceled");
            Ok(ActionOutcome {
                plan: Some(updated),
                workout: None,
            })
        }
        Transition::MarkDone => {
            let workout = workout_from_plan(&stored.value);

            // A previous attempt may have written this exact workout before
            // failing to update the plan. Any other record under the id is a
            // collision.
            match journal
                .find::<Workout>(Collection::Workouts, &workout.id)
                .await?
            {
                Some(existing) if existing.value == workout => {
                    tracing::debug!(plan_id = id, "Workout already logged by an earlier attempt");
                }
                Some(_) => {
                    return Err(AppError::Conflict("Workout already exists".to_string()));
                }
                None => {
                    journal
                        .insert(Collection::Workouts, plan_score(&stored.value)?, &workout)
                        .await?;
                }
            }

            let updated = StrengthPlan {
                status: PlanStatus::Done,
                status_updated_at: format_iso_millis(now),
                completed_workout_id: Some(workout.id.clone()),
                ..stored.value.clone()
            };
            swap_plan(journal, &stored, &updated).await?;

            tracing::info!(plan_id = id, workout_id = %workout.id, "Plan completed");
            Ok(ActionOutcome {
                plan: Some(updated),
                workout: Some(workout),
            })
        }
    }
}
