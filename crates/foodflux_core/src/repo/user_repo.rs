//! User repository contract and SQLite implementation.

use super::{RepoError, RepoResult, SqliteStore};
use crate::model::user::{User, UserId};
use rusqlite::{params, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, email, name, image FROM users";

/// Repository interface for user identity rows.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<()>;
    fn get_user(&self, id: &UserId) -> RepoResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

impl UserRepository for SqliteStore<'_> {
    fn create_user(&self, user: &User) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO users (id, email, name, image) VALUES (?1, ?2, ?3, ?4);",
            params![
                user.id.as_str(),
                user.email.as_deref(),
                user.name.as_deref(),
                user.image.as_deref(),
            ],
        )?;
        Ok(())
    }

    fn get_user(&self, id: &UserId) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id.as_str()],
                read_user_columns,
            )
            .optional()?
            .map(into_user)
            .transpose()
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE email = ?1;"),
                [email],
                read_user_columns,
            )
            .optional()?
            .map(into_user)
            .transpose()
    }
}

type UserColumns = (String, Option<String>, Option<String>, Option<String>);

fn read_user_columns(row: &Row<'_>) -> rusqlite::Result<UserColumns> {
    Ok((
        row.get("id")?,
        row.get("email")?,
        row.get("name")?,
        row.get("image")?,
    ))
}

fn into_user((id, email, name, image): UserColumns) -> RepoResult<User> {
    let id = UserId::parse(id.as_str())
        .map_err(|_| RepoError::InvalidData(format!("invalid user id `{id}` in users.id")))?;
    Ok(User {
        id,
        email,
        name,
        image,
    })
}
