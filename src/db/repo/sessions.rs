//! Session and participant operations for the repository.

use crate::datasource::{SessionSupplier, SupplierError};
use crate::domain::{ParticipantEntry, SessionId, SessionRecord, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::collections::HashMap;

use super::Repository;

impl Repository {
    /// Insert a session and its participant entries in one transaction.
    ///
    /// The participant list is expected to be normalized (no duplicate user
    /// ids) before it gets here; submission order is preserved via the
    /// `position` column.
    pub async fn insert_session(&self, record: &SessionRecord) -> Result<(), sqlx::Error> {
        let created_at = chrono::Utc::now().timestamp_millis();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sessions (id, date, machine_name, location, note, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.date.to_rfc3339())
        .bind(&record.machine_name)
        .bind(record.location.as_deref())
        .bind(record.note.as_deref())
        .bind(record.created_by.as_str())
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        for (position, participant) in record.participants.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO session_participants (session_id, user_id, invested, payout, position)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.id.as_str())
            .bind(participant.user_id.as_str())
            .bind(participant.invested)
            .bind(participant.payout)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Fetch every session the user participates in, newest date first,
    /// with participant lists in submission order.
    pub async fn query_sessions_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<SessionRecord>, SupplierError> {
        let session_rows = sqlx::query(
            r#"
            SELECT s.id, s.date, s.machine_name, s.location, s.note, s.created_by
            FROM sessions s
            JOIN session_participants sp ON sp.session_id = s.id
            WHERE sp.user_id = ?
            ORDER BY s.date DESC, s.id
            "#,
        )
        .bind(user.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(|e| SupplierError::Storage(e.to_string()))?;

        let session_ids: Vec<String> = session_rows
            .iter()
            .map(|r| r.get::<String, _>("id"))
            .collect();
        let mut participants = self.query_participants(&session_ids).await?;

        let mut records = Vec::with_capacity(session_rows.len());
        for row in session_rows {
            let id: String = row.get("id");
            let date = parse_stored_date(&id, row.get("date"))?;
            let entries = participants.remove(&id).unwrap_or_default();

            records.push(SessionRecord::new(
                SessionId::new(id),
                date,
                row.get("machine_name"),
                row.get("location"),
                row.get("note"),
                UserId::new(row.get::<String, _>("created_by")),
                entries,
            ));
        }

        Ok(records)
    }

    /// Fetch participant entries for a set of sessions, keyed by session id,
    /// each list in submission order. Negative stored amounts are structural
    /// violations and are reported, not coerced.
    async fn query_participants(
        &self,
        session_ids: &[String],
    ) -> Result<HashMap<String, Vec<ParticipantEntry>>, SupplierError> {
        let mut out: HashMap<String, Vec<ParticipantEntry>> = HashMap::new();
        if session_ids.is_empty() {
            return Ok(out);
        }

        // SQLite has a 999 parameter limit; chunk to 500 for safety margin.
        const CHUNK_SIZE: usize = 500;

        for chunk in session_ids.chunks(CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(",");
            let sql = format!(
                r#"
                SELECT session_id, user_id, invested, payout
                FROM session_participants
                WHERE session_id IN ({})
                ORDER BY session_id, position
                "#,
                placeholders
            );

            let mut query = sqlx::query(&sql);
            for id in chunk {
                query = query.bind(id);
            }

            let rows = query
                .fetch_all(self.pool())
                .await
                .map_err(|e| SupplierError::Storage(e.to_string()))?;

            for row in rows {
                let session_id: String = row.get("session_id");
                let invested: i64 = row.get("invested");
                let payout: i64 = row.get("payout");

                if invested < 0 || payout < 0 {
                    return Err(SupplierError::Malformed {
                        id: session_id,
                        reason: format!(
                            "negative amount for participant {}",
                            row.get::<String, _>("user_id")
                        ),
                    });
                }

                out.entry(session_id).or_default().push(ParticipantEntry::new(
                    UserId::new(row.get::<String, _>("user_id")),
                    invested,
                    payout,
                ));
            }
        }

        Ok(out)
    }
}

fn parse_stored_date(id: &str, raw: String) -> Result<DateTime<Utc>, SupplierError> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| SupplierError::Malformed {
            id: id.to_string(),
            reason: format!("unparseable date {:?}: {}", raw, e),
        })
}

#[async_trait]
impl SessionSupplier for Repository {
    async fn sessions_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<SessionRecord>, SupplierError> {
        self.query_sessions_for_user(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored_date_accepts_rfc3339() {
        let date = parse_stored_date("s1", "2024-05-01T12:30:00+09:00".to_string()).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-01T03:30:00+00:00");
    }

    #[test]
    fn test_parse_stored_date_reports_offender() {
        let err = parse_stored_date("s-42", "last tuesday".to_string()).unwrap_err();
        match err {
            SupplierError::Malformed { id, .. } => assert_eq!(id, "s-42"),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }
}
