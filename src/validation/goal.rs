use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{as_object, field, ValidationError};
use crate::models::UserGoal;
use crate::time_utils::format_iso_millis;

/// Validate a goal update. The text is stored trimmed.
pub fn validate_goal(input: &Value, now: DateTime<Utc>) -> Result<UserGoal, ValidationError> {
    let obj = as_object(input)?;

    let text = field(obj, "text")
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidText)?
        .trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyGoal);
    }

    Ok(UserGoal {
        text: text.to_string(),
        updated_at: format_iso_millis(now),
    })
}
