//! Entry repository contract and SQLite implementation.
//!
//! # Invariants
//! - Day listing returns insertion order (`rowid`), independent of the
//!   wall-clock `created_at` stamp.
//! - `food_item_id` is stored as given and never joined or validated.

use super::{parse_uuid, RepoError, RepoResult, SqliteStore};
use crate::model::date_key::DateKey;
use crate::model::entry::{Entry, EntryId};
use crate::model::user::UserId;
use rusqlite::{params, OptionalExtension, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    date_key,
    name,
    calories,
    food_item_id,
    created_at
FROM entries";

/// Repository interface for logged entries.
pub trait EntryRepository {
    fn create_entry(&self, entry: &Entry) -> RepoResult<EntryId>;
    /// Unscoped lookup; callers enforce ownership.
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    fn list_entries_for_day(&self, owner: &UserId, date_key: &DateKey) -> RepoResult<Vec<Entry>>;
    fn delete_entry(&self, id: EntryId, owner: &UserId) -> RepoResult<()>;
}

impl EntryRepository for SqliteStore<'_> {
    fn create_entry(&self, entry: &Entry) -> RepoResult<EntryId> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO entries (
                id,
                user_id,
                date_key,
                name,
                calories,
                food_item_id,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                entry.id.to_string(),
                entry.user_id.as_str(),
                entry.date_key.as_str(),
                entry.name.as_str(),
                entry.calories,
                entry.food_item_id.map(|id| id.to_string()),
                entry.created_at,
            ],
        )?;

        Ok(entry.id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        self.conn
            .query_row(
                &format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_entry_columns,
            )
            .optional()?
            .map(into_entry)
            .transpose()
    }

    fn list_entries_for_day(&self, owner: &UserId, date_key: &DateKey) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1 AND date_key = ?2
             ORDER BY rowid ASC;"
        ))?;
        let rows = stmt.query_map(
            params![owner.as_str(), date_key.as_str()],
            read_entry_columns,
        )?;

        let mut entries = Vec::new();
        for columns in rows {
            entries.push(into_entry(columns?)?);
        }
        Ok(entries)
    }

    fn delete_entry(&self, id: EntryId, owner: &UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM entries WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("entry", id));
        }
        Ok(())
    }
}

struct EntryColumns {
    id: String,
    user_id: String,
    date_key: String,
    name: String,
    calories: i64,
    food_item_id: Option<String>,
    created_at: i64,
}

fn read_entry_columns(row: &Row<'_>) -> rusqlite::Result<EntryColumns> {
    Ok(EntryColumns {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date_key: row.get("date_key")?,
        name: row.get("name")?,
        calories: row.get("calories")?,
        food_item_id: row.get("food_item_id")?,
        created_at: row.get("created_at")?,
    })
}

fn into_entry(columns: EntryColumns) -> RepoResult<Entry> {
    let food_item_id = columns
        .food_item_id
        .as_deref()
        .map(|value| parse_uuid(value, "entries.food_item_id"))
        .transpose()?;
    let user_id = UserId::parse(columns.user_id.as_str()).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid user id `{}` in entries.user_id",
            columns.user_id
        ))
    })?;
    let date_key = DateKey::parse(columns.date_key.as_str()).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date key `{}` in entries.date_key",
            columns.date_key
        ))
    })?;

    let entry = Entry {
        id: parse_uuid(&columns.id, "entries.id")?,
        user_id,
        date_key,
        name: columns.name,
        calories: columns.calories,
        food_item_id,
        created_at: columns.created_at,
    };
    entry.validate()?;
    Ok(entry)
}
