//! Filter evaluator: which sessions participate in an aggregation.

use crate::domain::{SessionRecord, UserId};
use serde::{Deserialize, Serialize};

/// Caller-supplied filter criteria for selecting sessions.
///
/// Both criteria are optional and combined with AND. An absent participant
/// filter matches everything; an absent or blank machine filter matches
/// everything. Pure and deterministic, so applying the same filter twice
/// yields the same subset as applying it once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFilter {
    /// Include only sessions this user participated in.
    pub participant: Option<UserId>,
    /// Include only sessions whose machine name contains this substring,
    /// case-insensitively. Leading/trailing whitespace is ignored.
    pub machine_name: Option<String>,
}

impl SessionFilter {
    /// A filter that matches every session.
    pub fn any() -> Self {
        SessionFilter::default()
    }

    /// True when no criterion is set (after trimming the machine needle).
    pub fn is_empty(&self) -> bool {
        self.participant.is_none()
            && self
                .machine_name
                .as_deref()
                .map(str::trim)
                .map_or(true, str::is_empty)
    }

    /// Inclusion decision for one session.
    pub fn matches(&self, session: &SessionRecord) -> bool {
        let match_participant = match &self.participant {
            Some(user) => session.has_participant(user),
            None => true,
        };

        let match_machine = match self.machine_name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => session
                .machine_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };

        match_participant && match_machine
    }
}
