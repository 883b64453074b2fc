//! Food preset model.
//!
//! # Invariants
//! - `name` is trimmed and non-empty.
//! - `calories_per_unit >= 0`.
//! - Names are not unique; two presets may share one.

use super::user::UserId;
use super::{ensure_non_negative, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type FoodItemId = Uuid;

/// Validated, user-editable part of a preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetFields {
    name: String,
    calories_per_unit: i64,
}

impl PresetFields {
    /// Trims `name` and checks both fields.
    pub fn new(name: &str, calories_per_unit: i64) -> Result<Self, ModelValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelValidationError::BlankPresetName);
        }
        ensure_non_negative("calories_per_unit", calories_per_unit)?;
        Ok(Self {
            name: name.to_string(),
            calories_per_unit,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn calories_per_unit(&self) -> i64 {
        self.calories_per_unit
    }
}

/// Reusable `(name, calories_per_unit)` template owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: FoodItemId,
    /// Owner.
    pub user_id: UserId,
    pub name: String,
    pub calories_per_unit: i64,
}

impl FoodItem {
    /// Creates a preset with a generated id.
    pub fn new(user_id: UserId, fields: PresetFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: fields.name,
            calories_per_unit: fields.calories_per_unit,
        }
    }

    /// Replaces name and calories in full; there is no partial update.
    pub fn apply(&mut self, fields: PresetFields) {
        self.name = fields.name;
        self.calories_per_unit = fields.calories_per_unit;
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        PresetFields::new(&self.name, self.calories_per_unit).map(|_| ())
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
