//! Aggregation engine: dashboard summary and day-bucketed chart rows.

use crate::engine::settlement::{div_round_half_away, SettledSession};
use serde::Serialize;
use std::collections::BTreeMap;

/// Roll-up of totals across a filtered set of sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub invest: i64,
    pub payout: i64,
    pub net: i64,
    /// Net divided by the sum of participant-list lengths across the
    /// selected sessions (participation instances, not distinct people),
    /// rounded half away from zero. Zero when no one participated.
    pub per_head: i64,
}

/// One day's summed net/invest/payout across the selected sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    /// UTC calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub net: i64,
    pub invest: i64,
    pub payout: i64,
}

/// Compute the dashboard summary over sessions already selected by the
/// filter evaluator. An empty selection yields the all-zero summary.
pub fn summarize(sessions: &[SettledSession]) -> Summary {
    let invest: i64 = sessions.iter().map(|s| s.totals.total_invest).sum();
    let payout: i64 = sessions.iter().map(|s| s.totals.total_payout).sum();
    let net = payout - invest;
    let participant_count: i64 = sessions
        .iter()
        .map(|s| s.record.participants.len() as i64)
        .sum();
    let per_head = if participant_count > 0 {
        div_round_half_away(net, participant_count)
    } else {
        0
    };

    Summary {
        invest,
        payout,
        net,
        per_head,
    }
}

/// Group the selected sessions by UTC calendar day and sum their derived
/// totals per day. One row per distinct day, ascending by day key. Empty
/// selection yields an empty vec.
pub fn chart_rows(sessions: &[SettledSession]) -> Vec<ChartRow> {
    let mut by_day: BTreeMap<String, (i64, i64, i64)> = BTreeMap::new();

    for session in sessions {
        let day = session.record.date.date_naive().format("%Y-%m-%d").to_string();
        let row = by_day.entry(day).or_insert((0, 0, 0));
        row.0 += session.totals.net;
        row.1 += session.totals.total_invest;
        row.2 += session.totals.total_payout;
    }

    by_day
        .into_iter()
        .map(|(date, (net, invest, payout))| ChartRow {
            date,
            net,
            invest,
            payout,
        })
        .collect()
}
