//! Core domain logic for the FoodFlux calorie tracker.
//! This crate is the single source of truth for tracker invariants.

pub mod config;
pub mod db;
pub mod identity;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod view;

pub use config::{ConfigError, TrackerConfig};
pub use identity::{
    ensure_user, FixedIdentityGateway, Identity, IdentityGateway, ProvisionedUser,
    StoredUserGateway,
};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::date_key::{
    adjacent_date_key, today_date_key, Clock, DateKey, DayDirection, SystemClock,
};
pub use model::entry::{Entry, EntryId};
pub use model::food_item::{FoodItem, FoodItemId, PresetFields};
pub use model::goal::DailyGoal;
pub use model::user::{User, UserId};
pub use model::ModelValidationError;
pub use repo::entry_repo::EntryRepository;
pub use repo::food_item_repo::FoodItemRepository;
pub use repo::goal_repo::GoalRepository;
pub use repo::user_repo::UserRepository;
pub use repo::{RepoError, RepoResult, SqliteStore};
pub use seed::{seed_demo_user, DEMO_EMAIL, DEMO_NAME};
pub use service::entry_resolution::{resolve_entry_fields, RawEntryFields, ResolvedEntryFields};
pub use service::tracker_service::{
    AddEntryRequest, DaySummary, DayView, TrackerError, TrackerResult, TrackerService,
};
pub use view::{LoggingInvalidator, NoopInvalidator, ViewInvalidator, ViewPath};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
