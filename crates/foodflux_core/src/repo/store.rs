//! Shared SQLite handle implementing every repository contract.

use super::{RepoError, RepoResult};
use crate::db::migrations::{current_user_version, latest_version};
use rusqlite::Connection;

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("users", &["id", "email", "name", "image"]),
    ("food_items", &["id", "user_id", "name", "calories_per_unit"]),
    (
        "entries",
        &[
            "id",
            "user_id",
            "date_key",
            "name",
            "calories",
            "food_item_id",
            "created_at",
        ],
    ),
    ("daily_goals", &["user_id", "goal_calories"]),
];

/// Borrowed SQLite connection checked against the tracker schema.
///
/// The connection itself is owned by the process entry point; this handle
/// is cheap to copy into services and gateways.
#[derive(Clone, Copy)]
pub struct SqliteStore<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what the repositories query.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
