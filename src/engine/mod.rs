//! Pure computation engine for settlement and dashboard aggregation.
//!
//! Everything in here is a deterministic function of its inputs: no I/O, no
//! shared state, safe to call concurrently without coordination. Records are
//! selected by `domain::SessionFilter` before they reach the aggregation
//! functions.

pub mod aggregate;
pub mod settlement;

pub use aggregate::{chart_rows, summarize, ChartRow, Summary};
pub use settlement::{div_round_half_away, settle, SettledSession, Settlement};
