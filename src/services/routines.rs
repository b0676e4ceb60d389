// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly routines and their expansion into plans.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::db::{Collection, Journal};
use crate::error::{AppError, Result};
use crate::models::plan::routine_plan_id;
use crate::models::{PlanSource, PlanStatus, RoutineRule, StrengthPlan};
use crate::services::plans::plan_score;
use crate::services::MAX_LIST_LIMIT;
use crate::time_utils::{
    format_iso_millis, format_ymd, local_date_at, parse_time_local, week_monday,
    wall_time_to_instant, OffsetOracle,
};
use crate::validation::{record_id, validate_routine_at};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of recent plans checked for already materialized ids.
const MATERIALIZE_SCAN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct MaterializeOutcome {
    /// `YYYY-MM-DD` of the local Monday
    pub week_monday: String,
    pub created_count: usize,
}

pub async fn list_routines(journal: &Journal) -> Result<Vec<RoutineRule>> {
    journal.list(Collection::Routines, MAX_LIST_LIMIT).await
}

pub async fn create_routine(journal: &Journal, input: &Value, now: DateTime<Utc>) -> Result<RoutineRule> {
    let validated = validate_routine_at(input, None, now)?;

    if journal
        .find::<RoutineRule>(Collection::Routines, &validated.value.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Routine already exists".to_string()));
    }

    journal
        .insert(Collection::Routines, validated.sort_key, &validated.value)
        .await?;

    tracing::info!(routine_id = %validated.value.id, "Routine created");
    Ok(validated.value)
}

pub async fn update_routine(journal: &Journal, input: &Value, now: DateTime<Utc>) -> Result<RoutineRule> {
    let obj = input.as_object().ok_or_else(AppError::invalid_json)?;
    let id = record_id(obj.get("id"))?;

    let existing = journal
        .find::<RoutineRule>(Collection::Routines, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Routine not found".to_string()))?;

    let validated = validate_routine_at(input, Some(&existing.value), now)?;

    if !journal
        .replace(Collection::Routines, &existing, validated.sort_key, &validated.value)
        .await?
    {
        return Err(AppError::Conflict(
            "Routine was modified concurrently".to_string(),
        ));
    }

    tracing::info!(routine_id = %id, "Routine updated");
    Ok(validated.value)
}

/// Plan produced by `rule` on the local calendar `date`, or `None` when the
/// stored rule carries an unusable time.
fn plan_for_rule(
    rule: &RoutineRule,
    oracle: &dyn OffsetOracle,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Option<StrengthPlan> {
    let time = parse_time_local(&rule.time_local)?;
    let planned_for = wall_time_to_instant(oracle, date, time);

    Some(StrengthPlan {
        id: routine_plan_id(&rule.id, &format_ymd(date)),
        planned_for: format_iso_millis(planned_for),
        duration_min: rule.duration_min,
        notes: rule
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string),
        exercises: Vec::new(),
        status: PlanStatus::Planned,
        status_updated_at: format_iso_millis(now),
        source: PlanSource::Routine,
        routine_id: Some(rule.id.clone()),
        completed_workout_id: None,
    })
}

/// Create this week's plans for every enabled routine.
///
/// The week is the one containing `now` in the oracle's zone. A plan whose
/// derived id already exists is left alone, so repeated calls in the same
/// week create nothing new.
pub async fn materialize_week(
    journal: &Journal,
    oracle: &dyn OffsetOracle,
    now: DateTime<Utc>,
) -> Result<MaterializeOutcome> {
    let monday = week_monday(local_date_at(oracle, now));

    let routines: Vec<RoutineRule> = list_routines(journal)
        .await?
        .into_iter()
        .filter(|rule| rule.is_enabled)
        .collect();

    let mut existing = journal.recent_ids(Collection::Plans, MATERIALIZE_SCAN).await?;
    let mut created_count = 0;

    for rule in &routines {
        let date = monday + Duration::days(i64::from(rule.weekday) - 1);
        let Some(plan) = plan_for_rule(rule, oracle, date, now) else {
            tracing::warn!(
                routine_id = %rule.id,
                time_local = %rule.time_local,
                "Skipping routine with bad time"
            );
            continue;
        };

        if existing.contains(&plan.id) || journal.is_indexed(Collection::Plans, &plan.id).await? {
            continue;
        }

        journal
            .insert(Collection::Plans, plan_score(&plan)?, &plan)
            .await?;
        existing.insert(plan.id);
        created_count += 1;
    }

    let week_monday = format_ymd(monday);
    tracing::info!(
        username = journal.username(),
        week_monday = %week_monday,
        routines = routines.len(),
        created_count,
        "Routines materialized"
    );

    Ok(MaterializeOutcome {
        week_monday,
        created_count,
    })
}
