// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly routine routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::RoutineRule;
use crate::routes::json_object;
use crate::services::{routines, MaterializeOutcome};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/routines",
            get(get_routines).post(post_routine).put(put_routine),
        )
        .route("/api/routines_materialize", post(materialize))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoutinesResponse {
    pub routines: Vec<RoutineRule>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoutineSavedResponse {
    pub ok: bool,
    pub routine: RoutineRule,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MaterializeResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub outcome: MaterializeOutcome,
}

async fn get_routines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RoutinesResponse>> {
    let routines = routines::list_routines(&state.journal(&user)).await?;
    Ok(Json(RoutinesResponse { routines }))
}

async fn post_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<RoutineSavedResponse>)> {
    let input = json_object(&body)?;
    let routine =
        routines::create_routine(&state.journal(&user), &input, chrono::Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(RoutineSavedResponse { ok: true, routine }),
    ))
}

async fn put_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<RoutineSavedResponse>> {
    let input = json_object(&body)?;
    let routine =
        routines::update_routine(&state.journal(&user), &input, chrono::Utc::now()).await?;
    Ok(Json(RoutineSavedResponse { ok: true, routine }))
}

/// Expand enabled routines into this week's plans.
async fn materialize(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MaterializeResponse>> {
    let outcome = routines::materialize_week(
        &state.journal(&user),
        &state.config.time_zone,
        chrono::Utc::now(),
    )
    .await?;
    Ok(Json(MaterializeResponse { ok: true, outcome }))
}
