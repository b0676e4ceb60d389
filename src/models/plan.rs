// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Planned strength sessions.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::{Exercise, Identified};

/// Lifecycle state of a plan.
///
/// `Missed` is accepted on the wire but nothing in this crate transitions
/// into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Planned,
    Done,
    Canceled,
    Missed,
}

impl PlanStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "planned" => Some(PlanStatus::Planned),
            "done" => Some(PlanStatus::Done),
            "canceled" => Some(PlanStatus::Canceled),
            "missed" => Some(PlanStatus::Missed),
            _ => None,
        }
    }
}

/// Where a plan came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    #[default]
    Manual,
    Ai,
    Routine,
}

impl PlanSource {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "manual" => Some(PlanSource::Manual),
            "ai" => Some(PlanSource::Ai),
            "routine" => Some(PlanSource::Routine),
            _ => None,
        }
    }
}

/// A scheduled strength session.
///
/// Routine-generated plans use the id `<routineId>:<YYYY-MM-DD>` and start
/// with no exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct StrengthPlan {
    pub id: String,
    /// Scheduled start (ISO 8601, UTC)
    pub planned_for: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub status: PlanStatus,
    /// Refreshed on every status transition
    pub status_updated_at: String,
    /// Older records predate this field and default to manual.
    #[serde(default)]
    pub source: PlanSource,
    /// Present iff `source` is `routine`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<String>,
    /// Workout emitted when the plan was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_workout_id: Option<String>,
}

impl StrengthPlan {
    pub fn is_done(&self) -> bool {
        self.status == PlanStatus::Done
    }
}

impl Identified for StrengthPlan {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Derived id of the plan a routine produces on `date` (`YYYY-MM-DD`).
pub fn routine_plan_id(routine_id: &str, date: &str) -> String {
    format!("{}:{}", routine_id, date)
}
