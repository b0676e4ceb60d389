// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout journal entries.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::Identified;

/// Closed set of sports a workout can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Run,
    LaserRun,
    Swim,
    Strength,
}

impl Sport {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "run" => Some(Sport::Run),
            "laser_run" => Some(Sport::LaserRun),
            "swim" => Some(Sport::Swim),
            "strength" => Some(Sport::Strength),
            _ => None,
        }
    }
}

/// A completed activity. Append-only: never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Caller-supplied identifier (at least 8 characters)
    pub id: String,
    /// Start time (ISO 8601, UTC)
    pub started_at: String,
    /// Sport discriminant plus its details
    #[serde(flatten)]
    pub details: WorkoutDetails,
    /// Duration in minutes. Absent only for workouts synthesized from a plan
    /// that had no duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    /// Perceived exertion, 1-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Workout {
    pub fn sport(&self) -> Sport {
        self.details.sport()
    }
}

impl Identified for Workout {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Sport-specific payload, serialized as `"sport": ..., "details": {...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(tag = "sport", content = "details", rename_all = "snake_case")]
pub enum WorkoutDetails {
    Run(RunDetails),
    LaserRun(RunDetails),
    Swim(SwimDetails),
    Strength(StrengthDetails),
}

impl WorkoutDetails {
    pub fn sport(&self) -> Sport {
        match self {
            WorkoutDetails::Run(_) => Sport::Run,
            WorkoutDetails::LaserRun(_) => Sport::LaserRun,
            WorkoutDetails::Swim(_) => Sport::Swim,
            WorkoutDetails::Strength(_) => Sport::Strength,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct RunDetails {
    pub distance_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_sec_per_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct SwimDetails {
    pub distance_m: f64,
    /// 25 or 50
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_length_m: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct StrengthDetails {
    pub exercises: Vec<Exercise>,
}

/// One exercise of a strength session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    pub name: String,
    pub sets: Vec<StrengthSet>,
}

/// A set carries `reps`, `duration_sec`, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct StrengthSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<f64>,
}
