//! Friendship edge operations for the repository.
//!
//! A friendship is a single directed edge: `user_id` requested, `friend_id`
//! was asked. Status moves pending -> accepted; declining deletes the edge.

use crate::domain::UserId;
use sqlx::Row;

use super::{Repository, UserRow};

/// Friendship lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
        }
    }

    fn parse(raw: &str) -> Self {
        // The schema CHECK constraint only admits these two values.
        match raw {
            "accepted" => FriendshipStatus::Accepted,
            _ => FriendshipStatus::Pending,
        }
    }
}

/// One friendship edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendshipRow {
    pub id: String,
    pub user_id: UserId,
    pub friend_id: UserId,
    pub status: FriendshipStatus,
}

/// An incoming pending request with the requester's user info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequestRow {
    pub id: String,
    pub from: UserRow,
}

fn friendship_from_row(row: &sqlx::sqlite::SqliteRow) -> FriendshipRow {
    FriendshipRow {
        id: row.get("id"),
        user_id: UserId::new(row.get::<String, _>("user_id")),
        friend_id: UserId::new(row.get::<String, _>("friend_id")),
        status: FriendshipStatus::parse(&row.get::<String, _>("status")),
    }
}

impl Repository {
    /// Find the friendship edge between two users, in either direction.
    pub async fn find_friendship_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<FriendshipRow>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, friend_id, status
            FROM friendships
            WHERE (user_id = ? AND friend_id = ?) OR (user_id = ? AND friend_id = ?)
            "#,
        )
        .bind(a.as_str())
        .bind(b.as_str())
        .bind(b.as_str())
        .bind(a.as_str())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(friendship_from_row))
    }

    /// Fetch a friendship edge by id.
    pub async fn get_friendship(&self, id: &str) -> Result<Option<FriendshipRow>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, friend_id, status
            FROM friendships
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(friendship_from_row))
    }

    /// Create a pending edge from `user` to `friend`.
    pub async fn insert_friendship(
        &self,
        id: &str,
        user: &UserId,
        friend: &UserId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO friendships (id, user_id, friend_id, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(user.as_str())
        .bind(friend.as_str())
        .bind(FriendshipStatus::Pending.as_str())
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Update an edge's status.
    pub async fn set_friendship_status(
        &self,
        id: &str,
        status: FriendshipStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE friendships SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Delete an edge (declined request).
    pub async fn delete_friendship(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM friendships WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// The other user of every accepted edge touching `user`, deduplicated.
    pub async fn accepted_friends_of(&self, user: &UserId) -> Result<Vec<UserRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT u.id, u.name, u.email
            FROM friendships f
            JOIN users u ON u.id = CASE WHEN f.user_id = ? THEN f.friend_id ELSE f.user_id END
            WHERE f.status = 'accepted' AND (f.user_id = ? OR f.friend_id = ?)
            ORDER BY u.id
            "#,
        )
        .bind(user.as_str())
        .bind(user.as_str())
        .bind(user.as_str())
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserRow {
                id: UserId::new(r.get::<String, _>("id")),
                name: r.get("name"),
                email: r.get("email"),
            })
            .collect())
    }

    /// Incoming pending requests addressed to `user`, oldest first.
    pub async fn pending_requests_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<PendingRequestRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT f.id AS request_id, u.id, u.name, u.email
            FROM friendships f
            JOIN users u ON u.id = f.user_id
            WHERE f.status = 'pending' AND f.friend_id = ?
            ORDER BY f.created_at
            "#,
        )
        .bind(user.as_str())
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PendingRequestRow {
                id: r.get("request_id"),
                from: UserRow {
                    id: UserId::new(r.get::<String, _>("id")),
                    name: r.get("name"),
                    email: r.get("email"),
                },
            })
            .collect())
    }
}
