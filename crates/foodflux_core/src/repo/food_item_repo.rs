//! Food preset repository contract and SQLite implementation.
//!
//! # Invariants
//! - Update and delete are scoped by owner; foreign rows never match.
//! - Deleting a preset never touches `entries`.
//! - Listing is ordered by name (case-insensitive), then id.

use super::{parse_uuid, RepoError, RepoResult, SqliteStore};
use crate::model::food_item::{FoodItem, FoodItemId};
use crate::model::user::UserId;
use rusqlite::{params, OptionalExtension, Row};

const FOOD_ITEM_SELECT_SQL: &str = "SELECT id, user_id, name, calories_per_unit FROM food_items";

/// Repository interface for food presets.
pub trait FoodItemRepository {
    fn create_food_item(&self, item: &FoodItem) -> RepoResult<FoodItemId>;
    /// Replaces name and calories of a preset owned by `item.user_id`.
    fn update_food_item(&self, item: &FoodItem) -> RepoResult<()>;
    /// Unscoped lookup; callers enforce ownership.
    fn get_food_item(&self, id: FoodItemId) -> RepoResult<Option<FoodItem>>;
    /// Lookup that only matches presets owned by `owner`.
    fn get_owned_food_item(&self, id: FoodItemId, owner: &UserId)
        -> RepoResult<Option<FoodItem>>;
    fn list_food_items(&self, owner: &UserId) -> RepoResult<Vec<FoodItem>>;
    fn delete_food_item(&self, id: FoodItemId, owner: &UserId) -> RepoResult<()>;
}

impl FoodItemRepository for SqliteStore<'_> {
    fn create_food_item(&self, item: &FoodItem) -> RepoResult<FoodItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO food_items (id, user_id, name, calories_per_unit)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id.to_string(),
                item.user_id.as_str(),
                item.name.as_str(),
                item.calories_per_unit,
            ],
        )?;

        Ok(item.id)
    }

    fn update_food_item(&self, item: &FoodItem) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE food_items
             SET name = ?1, calories_per_unit = ?2
             WHERE id = ?3 AND user_id = ?4;",
            params![
                item.name.as_str(),
                item.calories_per_unit,
                item.id.to_string(),
                item.user_id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("food item", item.id));
        }
        Ok(())
    }

    fn get_food_item(&self, id: FoodItemId) -> RepoResult<Option<FoodItem>> {
        self.conn
            .query_row(
                &format!("{FOOD_ITEM_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_food_item_columns,
            )
            .optional()?
            .map(into_food_item)
            .transpose()
    }

    fn get_owned_food_item(
        &self,
        id: FoodItemId,
        owner: &UserId,
    ) -> RepoResult<Option<FoodItem>> {
        self.conn
            .query_row(
                &format!("{FOOD_ITEM_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"),
                params![id.to_string(), owner.as_str()],
                read_food_item_columns,
            )
            .optional()?
            .map(into_food_item)
            .transpose()
    }

    fn list_food_items(&self, owner: &UserId) -> RepoResult<Vec<FoodItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FOOD_ITEM_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY name COLLATE NOCASE ASC, name ASC, id ASC;"
        ))?;
        let rows = stmt.query_map([owner.as_str()], read_food_item_columns)?;

        let mut items = Vec::new();
        for columns in rows {
            items.push(into_food_item(columns?)?);
        }
        Ok(items)
    }

    fn delete_food_item(&self, id: FoodItemId, owner: &UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM food_items WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("food item", id));
        }
        Ok(())
    }
}

type FoodItemColumns = (String, String, String, i64);

fn read_food_item_columns(row: &Row<'_>) -> rusqlite::Result<FoodItemColumns> {
    Ok((
        row.get("id")?,
        row.get("user_id")?,
        row.get("name")?,
        row.get("calories_per_unit")?,
    ))
}

fn into_food_item((id, user_id, name, calories_per_unit): FoodItemColumns) -> RepoResult<FoodItem> {
    let item = FoodItem {
        id: parse_uuid(&id, "food_items.id")?,
        user_id: UserId::parse(user_id.as_str()).map_err(|_| {
            RepoError::InvalidData(format!("invalid user id `{user_id}` in food_items.user_id"))
        })?,
        name,
        calories_per_unit,
    };
    item.validate()?;
    Ok(item)
}
