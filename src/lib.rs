pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use datasource::{MockSupplier, SessionSupplier, SupplierError};
pub use db::{init_db, Repository};
pub use domain::{
    dedupe_participants, ParticipantEntry, SessionFilter, SessionId, SessionRecord, UserId,
};
pub use engine::{chart_rows, settle, summarize, ChartRow, SettledSession, Settlement, Summary};
pub use error::AppError;
