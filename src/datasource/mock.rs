//! Mock supplier for testing without a database.

use super::{SessionSupplier, SupplierError};
use crate::domain::{SessionRecord, UserId};
use async_trait::async_trait;

/// In-memory supplier that returns predefined session records.
#[derive(Debug, Clone, Default)]
pub struct MockSupplier {
    sessions: Vec<SessionRecord>,
}

impl MockSupplier {
    /// Create a new mock supplier with no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session to the mock supplier.
    pub fn with_session(mut self, session: SessionRecord) -> Self {
        self.sessions.push(session);
        self
    }

    /// Add multiple sessions to the mock supplier.
    pub fn with_sessions(mut self, sessions: Vec<SessionRecord>) -> Self {
        self.sessions.extend(sessions);
        self
    }
}

#[async_trait]
impl SessionSupplier for MockSupplier {
    async fn sessions_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<SessionRecord>, SupplierError> {
        let mut selected: Vec<SessionRecord> = self
            .sessions
            .iter()
            .filter(|s| s.has_participant(user))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParticipantEntry, SessionId};
    use chrono::{TimeZone, Utc};

    fn session(id: &str, day: u32, user_ids: &[&str]) -> SessionRecord {
        SessionRecord::new(
            SessionId::new(id),
            Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
            "Juggler".to_string(),
            None,
            None,
            UserId::new(user_ids[0]),
            user_ids
                .iter()
                .map(|u| ParticipantEntry::new(UserId::new(*u), 1000, 0))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_scopes_to_participant_membership() {
        let supplier = MockSupplier::new()
            .with_session(session("s1", 1, &["u1", "u2"]))
            .with_session(session("s2", 2, &["u2"]));

        let for_u1 = supplier.sessions_for_user(&UserId::new("u1")).await.unwrap();
        assert_eq!(for_u1.len(), 1);
        assert_eq!(for_u1[0].id.as_str(), "s1");
    }

    #[tokio::test]
    async fn test_orders_newest_first() {
        let supplier = MockSupplier::new()
            .with_session(session("old", 1, &["u1"]))
            .with_session(session("new", 9, &["u1"]));

        let sessions = supplier.sessions_for_user(&UserId::new("u1")).await.unwrap();
        let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }
}
