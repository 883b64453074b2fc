//! Preset-based prefill of entry fields.
//!
//! # Invariants
//! - Resolution is pure: the preset is looked up by the caller, scoped to
//!   the acting user, and passed in.
//! - A preset only fills fields that are missing: a blank name, or calories
//!   equal to exactly zero. An explicit `0` is indistinguishable from
//!   "unset" and is therefore replaced by the preset's value.

use crate::model::food_item::FoodItem;
use crate::model::ModelValidationError;

/// Entry fields as submitted, after trimming and numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntryFields {
    pub name: String,
    pub calories: f64,
}

impl RawEntryFields {
    /// Trims `name` and replaces non-finite `calories` with `0`.
    pub fn normalize(name: &str, calories: f64) -> Self {
        Self {
            name: name.trim().to_string(),
            calories: if calories.is_finite() { calories } else { 0.0 },
        }
    }

    /// Whether a preset would be consulted for these fields.
    pub fn needs_preset(&self) -> bool {
        self.name.is_empty() || self.calories == 0.0
    }
}

/// Entry fields after preset prefill, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntryFields {
    pub name: String,
    pub calories: f64,
}

/// Fills missing entry fields from `preset`.
pub fn resolve_entry_fields(raw: &RawEntryFields, preset: Option<&FoodItem>) -> ResolvedEntryFields {
    let mut resolved = ResolvedEntryFields {
        name: raw.name.clone(),
        calories: raw.calories,
    };

    if let Some(preset) = preset {
        if resolved.name.is_empty() {
            resolved.name = preset.name.clone();
        }
        if resolved.calories == 0.0 {
            resolved.calories = preset.calories_per_unit as f64;
        }
    }

    resolved
}

/// Converts resolved calories into a storable whole number.
pub fn whole_calories(value: f64) -> Result<i64, ModelValidationError> {
    if value.fract() != 0.0 || value >= i64::MAX as f64 || value <= i64::MIN as f64 {
        return Err(ModelValidationError::CaloriesNotInteger(value.to_string()));
    }
    let calories = value as i64;
    if calories < 0 {
        return Err(ModelValidationError::NegativeCalories {
            field: "calories",
            value: calories,
        });
    }
    Ok(calories)
}
