// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strength plan routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::StrengthPlan;
use crate::routes::api::LimitQuery;
use crate::routes::json_object;
use crate::services::{clamp_limit, plans, ActionOutcome, PlanAction};
use crate::validation::record_id;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plans", get(get_plans).post(post_plan).put(put_plan))
        .route("/api/plans_action", post(plan_action))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlansResponse {
    pub plans: Vec<StrengthPlan>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanSavedResponse {
    pub ok: bool,
    pub plan: StrengthPlan,
}

/// `plan` and `workout` are present only when the action produced them.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanActionResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub outcome: ActionOutcome,
}

async fn get_plans(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<PlansResponse>> {
    let limit = clamp_limit(params.limit.as_deref());
    let plans = plans::list_plans(&state.journal(&user), limit).await?;
    Ok(Json(PlansResponse { plans }))
}

async fn post_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<PlanSavedResponse>)> {
    let input = json_object(&body)?;
    let plan = plans::create_plan(&state.journal(&user), &input, chrono::Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(PlanSavedResponse { ok: true, plan }),
    ))
}

async fn put_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<PlanSavedResponse>> {
    let input = json_object(&body)?;
    let plan = plans::update_plan(&state.journal(&user), &input, chrono::Utc::now()).await?;
    Ok(Json(PlanSavedResponse { ok: true, plan }))
}

/// Parse `{id, action}`. The id is checked first.
fn parse_action(input: &Value) -> Result<(String, PlanAction)> {
    let id = record_id(input.get("id"))?;
    let action = input
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest("Invalid action".to_string()))?
        .parse()?;
    Ok((id, action))
}

async fn plan_action(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<PlanActionResponse>> {
    let input = json_object(&body)?;
    let (id, action) = parse_action(&input)?;

    let outcome = plans::apply_action(&state.journal(&user), &id, action, chrono::Utc::now()).await?;
    Ok(Json(PlanActionResponse { ok: true, outcome }))
}
