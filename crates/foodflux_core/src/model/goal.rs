//! Daily calorie goal.
//!
//! Despite the name there is one goal per user, not one per day.

use super::user::UserId;
use super::{ensure_non_negative, ModelValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoal {
    pub user_id: UserId,
    pub goal_calories: i64,
}

impl DailyGoal {
    pub fn new(user_id: UserId, goal_calories: i64) -> Result<Self, ModelValidationError> {
        let goal = Self {
            user_id,
            goal_calories,
        };
        goal.validate()?;
        Ok(goal)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        ensure_non_negative("goal_calories", self.goal_calories)
    }
}
