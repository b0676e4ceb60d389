// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Recurring weekly routines.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::Identified;

/// Sports that can recur by rule. Strength sessions are planned ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum RoutineSport {
    LaserRun,
    Swim,
}

impl RoutineSport {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "laser_run" => Some(RoutineSport::LaserRun),
            "swim" => Some(RoutineSport::Swim),
            _ => None,
        }
    }
}

/// A weekly template materialized into plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct RoutineRule {
    /// Stable across edits
    pub id: String,
    pub sport: RoutineSport,
    /// 1 = Monday ... 7 = Sunday
    pub weekday: u8,
    /// `HH:MM` wall-clock time in the journal's reference zone
    pub time_local: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Identified for RoutineRule {
    fn record_id(&self) -> &str {
        &self.id
    }
}
