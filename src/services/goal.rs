//! The user's single training goal.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::db::Journal;
use crate::error::Result;
use crate::models::UserGoal;
use crate::validation::validate_goal;

pub async fn get_goal(journal: &Journal) -> Result<Option<UserGoal>> {
    journal.get_goal().await
}

/// Replace the goal wholesale.
pub async fn set_goal(journal: &Journal, input: &Value, now: DateTime<Utc>) -> Result<UserGoal> {
    let goal = validate_goal(input, now)?;
    journal.set_goal(&goal).await?;
    tracing::info!(username = journal.username(), "Goal updated");
    Ok(goal)
}
