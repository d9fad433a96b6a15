//! Repository layer for database operations.
//!
//! Methods are organized across submodules by domain:
//! - `sessions.rs` - session and participant operations, supplier impl
//! - `friends.rs` - friendship edge operations
//!
//! User bookkeeping lives here. User rows mirror the external identity
//! provider; this service never authenticates anyone itself.

mod friends;
mod sessions;

use crate::domain::UserId;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

pub use friends::{FriendshipRow, FriendshipStatus, PendingRequestRow};

/// A user as known to this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
}

/// Repository for database operations.
#[derive(Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // User operations

    /// Insert or update a user record synced from the identity provider.
    pub async fn upsert_user(
        &self,
        id: &UserId,
        name: Option<&str>,
        email: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, email = excluded.email
            "#,
        )
        .bind(id.as_str())
        .bind(name)
        .bind(email)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up a user by email, case-insensitively.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email
            FROM users
            WHERE email = ? COLLATE NOCASE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRow {
            id: UserId::new(r.get::<String, _>("id")),
            name: r.get("name"),
            email: r.get("email"),
        }))
    }

    /// Look up a user by id.
    pub async fn get_user(&self, id: &UserId) -> Result<Option<UserRow>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRow {
            id: UserId::new(r.get::<String, _>("id")),
            name: r.get("name"),
            email: r.get("email"),
        }))
    }

    /// Return the subset of `ids` with no user row, preserving input order.
    pub async fn missing_users(&self, ids: &[UserId]) -> Result<Vec<UserId>, sqlx::Error> {
        let mut missing = Vec::new();
        for id in ids {
            let exists = sqlx::query("SELECT 1 FROM users WHERE id = ?")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?
                .is_some();
            if !exists {
                missing.push(id.clone());
            }
        }
        Ok(missing)
    }
}
