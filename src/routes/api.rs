// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{UserGoal, Workout};
use crate::routes::{json_object, plans, routines};
use crate::services::{clamp_limit, goal, workouts};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(get_workouts).post(post_workout))
        .route("/api/goal", get(get_goal).put(put_goal))
        .merge(plans::routes())
        .merge(routines::routes())
}

/// Raw `?limit` query; parsed leniently by [`clamp_limit`].
#[derive(Deserialize)]
pub(crate) struct LimitQuery {
    pub limit: Option<String>,
}

// ─── Workouts ────────────────────────────────────────────────

#[derive(Deserialize)]
struct WorkoutsQuery {
    limit: Option<String>,
    /// Only workouts started within this many days
    since_days: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutsResponse {
    pub workouts: Vec<Workout>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutCreatedResponse {
    pub ok: bool,
    pub workout: Workout,
}

async fn get_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<WorkoutsQuery>,
) -> Result<Json<WorkoutsResponse>> {
    let limit = clamp_limit(params.limit.as_deref());
    // Unparseable values mean no time filter
    let since_days = params
        .since_days
        .as_deref()
        .and_then(|s| s.trim().parse::<u32>().ok());

    let workouts =
        workouts::list_workouts(&state.journal(&user), limit, since_days, chrono::Utc::now())
            .await?;

    Ok(Json(WorkoutsResponse { workouts }))
}

async fn post_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<WorkoutCreatedResponse>)> {
    let input = json_object(&body)?;
    let workout = workouts::create_workout(&state.journal(&user), &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkoutCreatedResponse { ok: true, workout }),
    ))
}

// ─── Goal ────────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalResponse {
    pub goal: Option<UserGoal>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalUpdatedResponse {
    pub ok: bool,
    pub goal: UserGoal,
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GoalResponse>> {
    let goal = goal::get_goal(&state.journal(&user)).await?;
    Ok(Json(GoalResponse { goal }))
}

async fn put_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<GoalUpdatedResponse>> {
    let input = json_object(&body)?;
    let goal = goal::set_goal(&state.journal(&user), &input, chrono::Utc::now()).await?;
    Ok(Json(GoalUpdatedResponse { ok: true, goal }))
}
