//! Persistence gateway: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define per-aggregate data access contracts (users, presets, entries,
//!   goals).
//! - Keep SQL details out of the domain service.
//!
//! # Invariants
//! - Write paths validate models before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Owner-scoped mutations report `NotFound` when no owned row matched.

use crate::db::DbError;
use crate::model::ModelValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod entry_repo;
pub mod food_item_repo;
pub mod goal_repo;
mod store;
pub mod user_repo;

pub use store::SqliteStore;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for tracker persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    /// No row of `kind` matched `id` (within the owner scope, when scoped).
    NotFound {
        kind: &'static str,
        id: String,
    },
    InvalidData(String),
    /// Connection was handed over before migrations ran.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<uuid::Uuid> {
    uuid::Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
