//! Session record supplier abstraction.
//!
//! The computation layer never talks to storage directly; it consumes
//! already authorization-scoped records from a supplier behind this trait.
//! The production supplier is the SQLite-backed `db::Repository`; tests use
//! `MockSupplier`.

use crate::domain::{SessionRecord, UserId};
use async_trait::async_trait;
use std::fmt;

pub mod mock;

pub use mock::MockSupplier;

/// Supplier of session records for one user.
#[async_trait]
pub trait SessionSupplier: Send + Sync + fmt::Debug {
    /// Every session in which the user appears as a participant, newest
    /// date first. Access control has already been applied: the result is
    /// scoped to what this user may see.
    async fn sessions_for_user(&self, user: &UserId)
        -> Result<Vec<SessionRecord>, SupplierError>;
}

/// Error type for supplier operations.
#[derive(Debug, Clone)]
pub enum SupplierError {
    /// Underlying storage failed.
    Storage(String),
    /// A stored record violates structural invariants (unparseable date,
    /// negative amount). Carries the offending record's id.
    Malformed { id: String, reason: String },
}

impl fmt::Display for SupplierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplierError::Storage(msg) => write!(f, "Storage error: {}", msg),
            SupplierError::Malformed { id, reason } => {
                write!(f, "Malformed record {}: {}", id, reason)
            }
        }
    }
}

impl std::error::Error for SupplierError {}
