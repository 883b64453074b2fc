//! Calorie tracker use-case service.
//!
//! # Responsibility
//! - Resolve the caller through the identity gateway for every operation.
//! - Validate preset, goal and entry input and resolve preset prefill.
//! - Compute per-day totals and the difference against the goal.
//! - Emit stale-view hints after each mutation.
//!
//! # Invariants
//! - No operation runs without a resolved user; absence is `Unauthorized`.
//! - Rows owned by another user are reported as `NotFound`, exactly like
//!   rows that do not exist.
//! - Entries persist the resolved name/calories, never the raw input.
//! - Every write touches a single row, so a failure leaves no partial state.

use crate::identity::IdentityGateway;
use crate::model::date_key::{today_date_key, Clock, DateKey, DayDirection};
use crate::model::entry::{Entry, EntryId};
use crate::model::food_item::{FoodItem, FoodItemId, PresetFields};
use crate::model::goal::DailyGoal;
use crate::model::user::UserId;
use crate::model::ModelValidationError;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::food_item_repo::FoodItemRepository;
use crate::repo::goal_repo::GoalRepository;
use crate::repo::RepoError;
use crate::service::entry_resolution::{resolve_entry_fields, whole_calories, RawEntryFields};
use crate::view::{ViewInvalidator, ViewPath};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Failure taxonomy surfaced to callers.
#[derive(Debug)]
pub enum TrackerError {
    /// No resolvable identity for the request.
    Unauthorized,
    /// Input violates a shape/range constraint; carries the reason.
    InvalidInput(String),
    /// Target row is absent or owned by someone else.
    NotFound,
    /// Persistence failure.
    Repo(RepoError),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::InvalidInput(reason) => write!(f, "{reason}"),
            Self::NotFound => write!(f, "not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for TrackerError {
    fn from(value: ModelValidationError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<RepoError> for TrackerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { .. } => Self::NotFound,
            RepoError::Validation(err) => Self::InvalidInput(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

/// Request model for logging one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AddEntryRequest {
    pub date_key: String,
    /// May be blank when `food_item_id` names a preset.
    pub name: String,
    /// Non-finite values are treated as `0`.
    pub calories: f64,
    pub food_item_id: Option<FoodItemId>,
}

/// Entries of one day with their aggregate against the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date_key: DateKey,
    /// Insertion order, oldest first.
    pub entries: Vec<Entry>,
    pub total: i64,
    /// `0` when the user never set a goal.
    pub goal_calories: i64,
    /// `goal_calories - total`; negative once the goal is exceeded.
    pub diff: i64,
}

/// Read model for the day screen: summary, navigation and presets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub today: DateKey,
    pub previous: DateKey,
    pub next: DateKey,
    pub summary: DaySummary,
    pub presets: Vec<FoodItem>,
}

/// Domain service over tracker repositories.
pub struct TrackerService<R, G, V> {
    repo: R,
    identity: G,
    views: V,
}

impl<R, G, V> TrackerService<R, G, V>
where
    R: FoodItemRepository + EntryRepository + GoalRepository,
    G: IdentityGateway,
    V: ViewInvalidator,
{
    /// Creates a service from explicitly constructed collaborators.
    pub fn new(repo: R, identity: G, views: V) -> Self {
        Self {
            repo,
            identity,
            views,
        }
    }

    /// Resolves the acting user or fails with `Unauthorized`.
    pub fn require_user_id(&self, subject: Option<&str>) -> TrackerResult<UserId> {
        self.identity
            .resolve(subject)?
            .map(|identity| identity.user_id)
            .ok_or(TrackerError::Unauthorized)
    }

    /// Creates a preset owned by the caller.
    pub fn create_preset(
        &self,
        subject: Option<&str>,
        name: &str,
        calories_per_unit: i64,
    ) -> TrackerResult<FoodItem> {
        let user_id = self.require_user_id(subject)?;
        let fields = PresetFields::new(name, calories_per_unit)?;

        let item = FoodItem::new(user_id, fields);
        self.repo.create_food_item(&item)?;
        info!(
            "event=preset_create module=service status=ok user_id={} food_item_id={}",
            item.user_id, item.id
        );
        self.views.invalidate(&ViewPath::Root);
        Ok(item)
    }

    /// Replaces name and calories of a preset owned by the caller.
    pub fn update_preset(
        &self,
        subject: Option<&str>,
        id: FoodItemId,
        name: &str,
        calories_per_unit: i64,
    ) -> TrackerResult<FoodItem> {
        let user_id = self.require_user_id(subject)?;
        let fields = PresetFields::new(name, calories_per_unit)?;

        let mut item = self.owned_preset(&user_id, id)?;
        item.apply(fields);
        self.repo.update_food_item(&item)?;
        info!(
            "event=preset_update module=service status=ok user_id={user_id} food_item_id={id}"
        );
        self.views.invalidate(&ViewPath::Root);
        Ok(item)
    }

    /// Deletes a preset owned by the caller. Entries referencing it are kept.
    pub fn delete_preset(&self, subject: Option<&str>, id: FoodItemId) -> TrackerResult<()> {
        let user_id = self.require_user_id(subject)?;

        self.owned_preset(&user_id, id)?;
        self.repo.delete_food_item(id, &user_id)?;
        info!(
            "event=preset_delete module=service status=ok user_id={user_id} food_item_id={id}"
        );
        self.views.invalidate(&ViewPath::Root);
        Ok(())
    }

    /// Lists the caller's presets by name.
    pub fn list_presets(&self, subject: Option<&str>) -> TrackerResult<Vec<FoodItem>> {
        let user_id = self.require_user_id(subject)?;
        Ok(self.repo.list_food_items(&user_id)?)
    }

    /// Creates or overwrites the caller's single calorie goal.
    pub fn set_goal(&self, subject: Option<&str>, goal_calories: i64) -> TrackerResult<DailyGoal> {
        let user_id = self.require_user_id(subject)?;
        let goal = DailyGoal::new(user_id, goal_calories)?;

        self.repo.upsert_goal(&goal)?;
        info!(
            "event=goal_set module=service status=ok user_id={} goal_calories={}",
            goal.user_id, goal.goal_calories
        );
        self.views.invalidate(&ViewPath::Root);
        Ok(goal)
    }

    /// Logs one entry, filling a blank name or zero calories from the
    /// caller's preset when `food_item_id` is given.
    ///
    /// # Errors
    /// - `InvalidInput` for a date key outside 8-10 characters, a name that
    ///   is still blank after prefill, or fractional/negative calories.
    /// - A `food_item_id` that is unknown or owned by someone else is not an
    ///   error; it simply contributes nothing and is still stored.
    pub fn add_entry(
        &self,
        subject: Option<&str>,
        request: &AddEntryRequest,
    ) -> TrackerResult<Entry> {
        let user_id = self.require_user_id(subject)?;

        let raw = RawEntryFields::normalize(&request.name, request.calories);
        let preset = match request.food_item_id {
            Some(food_item_id) if raw.needs_preset() => {
                self.repo.get_owned_food_item(food_item_id, &user_id)?
            }
            _ => None,
        };
        let resolved = resolve_entry_fields(&raw, preset.as_ref());

        let date_key = DateKey::parse(request.date_key.as_str())?;
        if resolved.name.is_empty() {
            return Err(ModelValidationError::EntryNameRequired.into());
        }
        let calories = whole_calories(resolved.calories)?;

        let entry = Entry::new(
            user_id,
            date_key,
            resolved.name,
            calories,
            request.food_item_id,
        )?;
        self.repo.create_entry(&entry)?;
        info!(
            "event=entry_add module=service status=ok user_id={} entry_id={} date_key={} calories={} preset_applied={}",
            entry.user_id,
            entry.id,
            entry.date_key,
            entry.calories,
            preset.is_some()
        );
        self.views.invalidate(&ViewPath::Day(entry.date_key.clone()));
        Ok(entry)
    }

    /// Deletes an entry owned by the caller.
    pub fn delete_entry(&self, subject: Option<&str>, id: EntryId) -> TrackerResult<()> {
        let user_id = self.require_user_id(subject)?;

        let entry = match self.repo.get_entry(id)? {
            Some(entry) if entry.is_owned_by(&user_id) => entry,
            _ => {
                warn!("event=entry_delete module=service status=denied user_id={user_id} entry_id={id}");
                return Err(TrackerError::NotFound);
            }
        };
        self.repo.delete_entry(id, &user_id)?;
        info!(
            "event=entry_delete module=service status=ok user_id={user_id} entry_id={id} date_key={}",
            entry.date_key
        );
        self.views.invalidate(&ViewPath::Day(entry.date_key));
        Ok(())
    }

    /// Aggregates one day for an already resolved user.
    pub fn list_day(&self, user_id: &UserId, date_key: &DateKey) -> TrackerResult<DaySummary> {
        let entries = self.repo.list_entries_for_day(user_id, date_key)?;
        let goal_calories = self
            .repo
            .get_goal(user_id)?
            .map_or(0, |goal| goal.goal_calories);

        let total = entries
            .iter()
            .fold(0_i64, |sum, entry| sum.saturating_add(entry.calories));

        Ok(DaySummary {
            date_key: date_key.clone(),
            entries,
            total,
            goal_calories,
            diff: goal_calories.saturating_sub(total),
        })
    }

    /// Aggregates one day for the caller.
    pub fn day_summary(&self, subject: Option<&str>, date_key: &str) -> TrackerResult<DaySummary> {
        let user_id = self.require_user_id(subject)?;
        let date_key = DateKey::parse(date_key)?;
        self.list_day(&user_id, &date_key)
    }

    /// Builds the day screen; a missing or blank `date_key` means today.
    pub fn day_view(
        &self,
        subject: Option<&str>,
        date_key: Option<&str>,
        clock: &impl Clock,
    ) -> TrackerResult<DayView> {
        let user_id = self.require_user_id(subject)?;

        let today = today_date_key(clock);
        let date_key = match date_key.filter(|value| !value.trim().is_empty()) {
            Some(value) => DateKey::parse(value)?,
            None => today.clone(),
        };
        let previous = date_key.adjacent(DayDirection::Previous)?;
        let next = date_key.adjacent(DayDirection::Next)?;

        let summary = self.list_day(&user_id, &date_key)?;
        let presets = self.repo.list_food_items(&user_id)?;

        Ok(DayView {
            today,
            previous,
            next,
            summary,
            presets,
        })
    }

    fn owned_preset(&self, user_id: &UserId, id: FoodItemId) -> TrackerResult<FoodItem> {
        match self.repo.get_food_item(id)? {
            Some(item) if item.is_owned_by(user_id) => Ok(item),
            _ => {
                warn!("event=preset_lookup module=service status=denied user_id={user_id} food_item_id={id}");
                Err(TrackerError::NotFound)
            }
        }
    }
}
