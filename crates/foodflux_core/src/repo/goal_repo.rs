//! Daily goal repository contract and SQLite implementation.
//!
//! # Invariants
//! - At most one row per user, enforced by the `user_id` primary key.
//! - `upsert_goal` is a single atomic statement, so concurrent writers can
//!   never produce two rows for one user.

use super::{RepoResult, SqliteStore};
use crate::model::goal::DailyGoal;
use crate::model::user::UserId;
use rusqlite::{params, OptionalExtension};

/// Repository interface for the per-user calorie goal.
pub trait GoalRepository {
    /// Creates the goal row or overwrites `goal_calories` on the existing one.
    fn upsert_goal(&self, goal: &DailyGoal) -> RepoResult<()>;
    fn get_goal(&self, owner: &UserId) -> RepoResult<Option<DailyGoal>>;
}

impl GoalRepository for SqliteStore<'_> {
    fn upsert_goal(&self, goal: &DailyGoal) -> RepoResult<()> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO daily_goals (user_id, goal_calories)
             VALUES (?1, ?2)
             ON CONFLICT (user_id) DO UPDATE SET
                goal_calories = excluded.goal_calories,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![goal.user_id.as_str(), goal.goal_calories],
        )?;
        Ok(())
    }

    fn get_goal(&self, owner: &UserId) -> RepoResult<Option<DailyGoal>> {
        let goal_calories: Option<i64> = self
            .conn
            .query_row(
                "SELECT goal_calories FROM daily_goals WHERE user_id = ?1;",
                [owner.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        goal_calories
            .map(|goal_calories| DailyGoal::new(owner.clone(), goal_calories))
            .transpose()
            .map_err(Into::into)
    }
}
