//! Session records: one recorded gambling outing shared among participants.

use crate::domain::{ParticipantEntry, SessionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded outing with per-participant invested/payout figures.
///
/// Records are constructed fresh from each supplier query and never mutated
/// by the computation layer. Derived totals (invest/payout/net/per-head) are
/// not stored here; they are computed per invocation by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique identifier.
    pub id: SessionId,
    /// When the session took place. Stored and bucketed in UTC.
    pub date: DateTime<Utc>,
    /// Machine label, free text. Used for fuzzy filtering.
    pub machine_name: String,
    /// Where it happened, free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-text note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Who registered the session.
    pub created_by: UserId,
    /// Participant entries, submission order preserved.
    pub participants: Vec<ParticipantEntry>,
}

impl SessionRecord {
    /// Create a new SessionRecord.
    pub fn new(
        id: SessionId,
        date: DateTime<Utc>,
        machine_name: String,
        location: Option<String>,
        note: Option<String>,
        created_by: UserId,
        participants: Vec<ParticipantEntry>,
    ) -> Self {
        SessionRecord {
            id,
            date,
            machine_name,
            location,
            note,
            created_by,
            participants,
        }
    }

    /// Whether the given user appears in the participant list.
    pub fn has_participant(&self, user: &UserId) -> bool {
        self.participants.iter().any(|p| &p.user_id == user)
    }
}
