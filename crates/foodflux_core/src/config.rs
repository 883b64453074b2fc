//! Process configuration loaded from environment variables.
//!
//! # Responsibility
//! - Resolve the database location with fallbacks across common variables.
//! - Resolve log level and optional log directory.
//!
//! # Invariants
//! - Loading never panics; bad values are reported as `ConfigError`.
//! - `DATABASE_URL` wins over `SQLITE_DATABASE_URL`; blank values count as
//!   unset.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DATABASE_FILE: &str = "foodflux.sqlite3";
const DATABASE_URL_KEYS: &[&str] = &["DATABASE_URL", "SQLITE_DATABASE_URL"];
const LOG_LEVEL_KEY: &str = "FOODFLUX_LOG_LEVEL";
const LOG_DIR_KEY: &str = "FOODFLUX_LOG_DIR";
const SQLITE_URL_PREFIXES: &[&str] = &["sqlite://", "sqlite:", "file:"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(reason) => write!(f, "{LOG_LEVEL_KEY}: {reason}"),
            Self::InvalidLogDir(reason) => write!(f, "{LOG_DIR_KEY}: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub database_path: PathBuf,
    /// Which variable supplied `database_path`; `None` for the default.
    pub database_source: Option<&'static str>,
    pub log_level: &'static str,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (database_path, database_source) = DATABASE_URL_KEYS
            .iter()
            .find_map(|&key| non_blank(key).map(|value| (database_path_from_url(&value), Some(key))))
            .unwrap_or_else(|| (PathBuf::from(DEFAULT_DATABASE_FILE), None));

        let log_level = match non_blank(LOG_LEVEL_KEY) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = non_blank(LOG_DIR_KEY)
            .map(|value| normalize_log_dir(&value).map_err(ConfigError::InvalidLogDir))
            .transpose()?;

        Ok(Self {
            database_path,
            database_source,
            log_level,
            log_dir,
        })
    }
}

fn database_path_from_url(url: &str) -> PathBuf {
    let trimmed = url.trim();
    let path = SQLITE_URL_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    PathBuf::from(path)
}
