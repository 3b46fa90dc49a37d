use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{is_unique_violation, Database};
use crate::feed::{NewUser, User};
use crate::{Error, Result};

/// Repository for user CRUD operations
pub struct UserRepository {
    db: Database,
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Register a new user; a taken name is `UserExists`
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&new_user.name)
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::UserExists(new_user.name.clone())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(User {
            id,
            name: new_user.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Find a user by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at
            FROM users
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(User::from))
    }

    /// List all users, oldest registration first
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Delete every user. Feeds, follows, and posts go with them via
    /// cascading deletes.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
