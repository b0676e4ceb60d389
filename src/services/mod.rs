// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod goal;
pub mod plans;
pub mod routines;
pub mod workouts;

pub use plans::{ActionOutcome, PlanAction};
pub use routines::MaterializeOutcome;

/// Page size used when a list request gives no usable limit.
pub const DEFAULT_LIST_LIMIT: usize = 30;
/// Largest page a list request may ask for.
pub const MAX_LIST_LIMIT: usize = 200;

/// Page size from a raw `limit` query value, clamped to
/// `1..=MAX_LIST_LIMIT`. Missing, zero or non-numeric values give the
/// default.
pub fn clamp_limit(raw: Option<&str>) -> usize {
    let requested = raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n != 0.0);

    match requested {
        Some(n) if n < 1.0 => 1,
        Some(n) => n.min(MAX_LIST_LIMIT as f64) as usize,
        None => DEFAULT_LIST_LIMIT,
    }
}
