//! Settlement calculator: per-session totals and equal split.

use crate::domain::{ParticipantEntry, SessionRecord};
use serde::Serialize;

/// Derived totals for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Sum of invested across all entries.
    pub total_invest: i64,
    /// Sum of payout across all entries.
    pub total_payout: i64,
    /// Payout minus invest. May be negative.
    pub net: i64,
    /// Net divided equally among participants, rounded to the nearest yen.
    /// Zero for an empty participant list.
    pub per_head: i64,
}

/// A session record paired with its derived totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledSession {
    pub record: SessionRecord,
    pub totals: Settlement,
}

impl SettledSession {
    /// Settle a record's participant entries and pair them up.
    pub fn new(record: SessionRecord) -> Self {
        let totals = settle(&record.participants);
        SettledSession { record, totals }
    }
}

/// Compute the settlement for one session's participant entries.
///
/// Pure and total: any amounts and an empty list are accepted, and an empty
/// list yields the all-zero settlement rather than an error.
pub fn settle(entries: &[ParticipantEntry]) -> Settlement {
    let total_invest: i64 = entries.iter().map(|p| p.invested).sum();
    let total_payout: i64 = entries.iter().map(|p| p.payout).sum();
    let net = total_payout - total_invest;
    let per_head = if entries.is_empty() {
        0
    } else {
        div_round_half_away(net, entries.len() as i64)
    };

    Settlement {
        total_invest,
        total_payout,
        net,
        per_head,
    }
}

/// Nearest-integer division with exact `.5` ties rounded away from zero.
///
/// `denom` must be positive (participant counts always are). Implemented in
/// integer arithmetic so the result is identical across platforms:
/// `div_round_half_away(100, 3) == 33`, `div_round_half_away(5, 2) == 3`,
/// `div_round_half_away(-5, 2) == -3`.
pub fn div_round_half_away(numer: i64, denom: i64) -> i64 {
    debug_assert!(denom > 0);
    let quot = numer / denom;
    let rem = numer % denom;
    if 2 * rem.abs() >= denom {
        quot + numer.signum()
    } else {
        quot
    }
}
