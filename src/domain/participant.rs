//! Participant entries and submission normalization.

use crate::domain::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One person's invested/payout figures within a session.
///
/// Amounts are in the smallest currency unit (yen) and are non-negative by
/// invariant; range validation happens at the ingestion boundary, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEntry {
    /// Participant's user id, unique within a session's list.
    pub user_id: UserId,
    /// Money put in.
    pub invested: i64,
    /// Money recovered.
    pub payout: i64,
}

impl ParticipantEntry {
    /// Create a new ParticipantEntry.
    pub fn new(user_id: UserId, invested: i64, payout: i64) -> Self {
        ParticipantEntry {
            user_id,
            invested,
            payout,
        }
    }
}

/// Collapse duplicate user ids in a submitted participant list.
///
/// The last-submitted entry for a given id wins; output order is the order
/// of each id's first occurrence. Applied wherever a participant list is
/// accepted, before persistence and before any computation, so one person's
/// figures are never double-counted.
pub fn dedupe_participants(entries: Vec<ParticipantEntry>) -> Vec<ParticipantEntry> {
    let mut slot_by_id: HashMap<UserId, usize> = HashMap::with_capacity(entries.len());
    let mut deduped: Vec<ParticipantEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        match slot_by_id.get(&entry.user_id) {
            Some(&slot) => deduped[slot] = entry,
            None => {
                slot_by_id.insert(entry.user_id.clone(), deduped.len());
                deduped.push(entry);
            }
        }
    }

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, invested: i64, payout: i64) -> ParticipantEntry {
        ParticipantEntry::new(UserId::new(id), invested, payout)
    }

    #[test]
    fn test_dedupe_keeps_distinct_entries() {
        let entries = vec![entry("u1", 100, 0), entry("u2", 200, 50)];
        assert_eq!(dedupe_participants(entries.clone()), entries);
    }

    #[test]
    fn test_dedupe_last_write_wins() {
        let entries = vec![entry("u1", 100, 0), entry("u1", 200, 50)];
        let deduped = dedupe_participants(entries);
        assert_eq!(deduped, vec![entry("u1", 200, 50)]);
    }

    #[test]
    fn test_dedupe_preserves_first_occurrence_order() {
        let entries = vec![
            entry("u1", 100, 0),
            entry("u2", 300, 300),
            entry("u1", 200, 50),
            entry("u3", 400, 0),
        ];
        let deduped = dedupe_participants(entries);
        assert_eq!(
            deduped,
            vec![entry("u1", 200, 50), entry("u2", 300, 300), entry("u3", 400, 0)]
        );
    }

    #[test]
    fn test_dedupe_empty_list() {
        assert!(dedupe_participants(Vec::new()).is_empty());
    }
}
