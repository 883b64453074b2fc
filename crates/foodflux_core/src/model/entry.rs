//! Logged food consumption entry.
//!
//! # Invariants
//! - `name` is non-empty and `calories >= 0`.
//! - `food_item_id` is a weak reference: it is kept even after the preset
//!   it points at is edited or deleted.
//! - Entries are immutable once created; they are only added or deleted.

use super::date_key::DateKey;
use super::food_item::FoodItemId;
use super::user::UserId;
use super::{ensure_non_negative, ModelValidationError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EntryId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub user_id: UserId,
    pub date_key: DateKey,
    pub name: String,
    pub calories: i64,
    /// Preset used to prefill this entry, if any.
    pub food_item_id: Option<FoodItemId>,
    /// Unix epoch milliseconds. Informational; listing follows insertion order.
    pub created_at: i64,
}

impl Entry {
    /// Creates a validated entry stamped with the current time.
    pub fn new(
        user_id: UserId,
        date_key: DateKey,
        name: impl Into<String>,
        calories: i64,
        food_item_id: Option<FoodItemId>,
    ) -> Result<Self, ModelValidationError> {
        let entry = Self {
            id: Uuid::new_v4(),
            user_id,
            date_key,
            name: name.into(),
            calories,
            food_item_id,
            created_at: Utc::now().timestamp_millis(),
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EntryNameRequired);
        }
        ensure_non_negative("calories", self.calories)
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
