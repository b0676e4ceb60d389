// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout journal entries. Workouts are append-only.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::db::{Collection, Journal};
use crate::error::{AppError, Result};
use crate::models::Workout;
use crate::time_utils::parse_instant;
use crate::validation::validate_workout;

pub async fn create_workout(journal: &Journal, input: &Value) -> Result<Workout> {
    let validated = validate_workout(input)?;

    if journal
        .find::<Workout>(Collection::Workouts, &validated.value.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Workout already exists".to_string()));
    }

    journal
        .insert(Collection::Workouts, validated.sort_key, &validated.value)
        .await?;

    tracing::info!(
        workout_id = %validated.value.id,
        sport = ?validated.value.sport(),
        "Workout logged"
    );
    Ok(validated.value)
}

/// Newest-first workouts. With `since_days`, only workouts started within
/// that many days before `now` are kept.
pub async fn list_workouts(
    journal: &Journal,
    limit: usize,
    since_days: Option<u32>,
    now: DateTime<Utc>,
) -> Result<Vec<Workout>> {
    let workouts: Vec<Workout> = journal.list(Collection::Workouts, limit).await?;

    let Some(days) = since_days else {
        return Ok(workouts);
    };
    let cutoff = now - Duration::days(i64::from(days));

    Ok(workouts
        .into_iter()
        .filter(|workout| parse_instant(&workout.started_at).is_some_and(|t| t >= cutoff))
        .collect())
}
