//! Tracker domain model.
//!
//! # Responsibility
//! - Define users, food presets, entries, daily goals and date keys.
//! - Own field-level validation shared by service and repository layers.
//!
//! # Invariants
//! - Every preset, entry and goal is owned by exactly one `UserId`.
//! - Calorie values are whole numbers and never negative.
//! - Entry `date_key` is 8-10 characters; calendar validity is only
//!   required for navigation.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod date_key;
pub mod entry;
pub mod food_item;
pub mod goal;
pub mod user;

/// Field-level validation failure for model values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// User id is empty after trim.
    BlankUserId,
    /// User email is empty after trim.
    BlankEmail,
    /// A generated or parsed record id is the nil UUID.
    NilId,
    /// Preset name is empty after trim.
    BlankPresetName,
    /// Entry name is empty after trim and no preset supplied one.
    EntryNameRequired,
    /// A calorie-like field holds a negative value.
    NegativeCalories { field: &'static str, value: i64 },
    /// Entry calories are not a whole number (or exceed the storable range).
    CaloriesNotInteger(String),
    /// Date key length is outside `8..=10`.
    DateKeyLength { len: usize },
    /// Date key cannot be read as a `YYYY-MM-DD` calendar date.
    InvalidCalendarDate(String),
    /// Date key has no neighbour within the supported calendar range.
    DateOutOfRange(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUserId => write!(f, "user id must not be blank"),
            Self::BlankEmail => write!(f, "email must not be blank"),
            Self::NilId => write!(f, "id must not be the nil uuid"),
            Self::BlankPresetName => write!(f, "preset name must not be blank"),
            Self::EntryNameRequired => {
                write!(f, "food name required, enter a name or select a preset")
            }
            Self::NegativeCalories { field, value } => {
                write!(f, "{field} must be non-negative, got {value}")
            }
            Self::CaloriesNotInteger(value) => {
                write!(f, "calories must be a whole number, got {value}")
            }
            Self::DateKeyLength { len } => {
                write!(f, "invalid date key: expected 8-10 characters, got {len}")
            }
            Self::InvalidCalendarDate(value) => {
                write!(f, "invalid date key `{value}`: expected YYYY-MM-DD")
            }
            Self::DateOutOfRange(value) => {
                write!(f, "date key `{value}` has no adjacent day in range")
            }
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: i64,
) -> Result<(), ModelValidationError> {
    if value < 0 {
        return Err(ModelValidationError::NegativeCalories { field, value });
    }
    Ok(())
}
