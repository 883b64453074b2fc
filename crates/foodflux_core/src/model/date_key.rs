//! Calendar-day keys and adjacent-day navigation.
//!
//! # Responsibility
//! - Validate the `date_key` partition key used by entries.
//! - Move a key one calendar day backward or forward.
//! - Derive "today" from an injectable clock.
//!
//! # Invariants
//! - A stored key is 8-10 characters; its calendar validity is not checked.
//! - Navigation parses keys as timezone-free calendar dates, so month/year
//!   rollover and leap days never depend on the host timezone.
//! - Rendered keys are always zero-padded `YYYY-MM-DD`.

use super::ModelValidationError;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DATE_KEY_MIN_LEN: usize = 8;
pub const DATE_KEY_MAX_LEN: usize = 10;
const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Partition key and navigation cursor for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

/// Navigation direction for [`DateKey::adjacent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayDirection {
    Previous,
    Next,
}

impl DateKey {
    /// Accepts any value whose length is within `8..=10` characters.
    ///
    /// `2024-2-5` and even `abcdefgh` pass; only navigation needs a real date.
    pub fn parse(value: impl Into<String>) -> Result<Self, ModelValidationError> {
        let value = value.into();
        let len = value.chars().count();
        if !(DATE_KEY_MIN_LEN..=DATE_KEY_MAX_LEN).contains(&len) {
            return Err(ModelValidationError::DateKeyLength { len });
        }
        Ok(Self(value))
    }

    /// Renders a calendar date in canonical form.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(DATE_KEY_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Reads this key as a calendar date. Zero padding is optional.
    pub fn to_date(&self) -> Result<NaiveDate, ModelValidationError> {
        NaiveDate::parse_from_str(self.0.trim(), DATE_KEY_FORMAT)
            .map_err(|_| ModelValidationError::InvalidCalendarDate(self.0.clone()))
    }

    /// Returns the key exactly one calendar day away.
    pub fn adjacent(&self, direction: DayDirection) -> Result<Self, ModelValidationError> {
        let date = self.to_date()?;
        let shifted = match direction {
            DayDirection::Previous => date.pred_opt(),
            DayDirection::Next => date.succ_opt(),
        };
        shifted
            .map(Self::from_date)
            .ok_or_else(|| ModelValidationError::DateOutOfRange(self.0.clone()))
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DateKey {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.0
    }
}

/// Moves a raw date key one day in `direction` and renders `YYYY-MM-DD`.
pub fn adjacent_date_key(
    date_key: &str,
    direction: DayDirection,
) -> Result<String, ModelValidationError> {
    let key = DateKey::parse(date_key)?;
    key.adjacent(direction).map(String::from)
}

/// Source of the current calendar day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock reading today's date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Returns today's key according to `clock`.
pub fn today_date_key(clock: &impl Clock) -> DateKey {
    DateKey::from_date(clock.today())
}
