// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod goal;
pub mod plan;
pub mod routine;
pub mod workout;

pub use goal::UserGoal;
pub use plan::{PlanSource, PlanStatus, StrengthPlan};
pub use routine::{RoutineRule, RoutineSport};
pub use workout::{
    Exercise, RunDetails, Sport, StrengthDetails, StrengthSet, SwimDetails, Workout,
    WorkoutDetails,
};

/// Records addressable by their string id inside a sorted collection.
pub trait Identified {
    fn record_id(&self) -> &str;
}
