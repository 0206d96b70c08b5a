//! Remote persistence gateway - the boundary the ledger store depends on.
//!
//! The store never talks to a database directly. It goes through
//! [`TransactionGateway`], which offers exactly three operations: a filtered,
//! ordered read; an insert that returns the server-completed record; and a delete
//! by id that reports whether anything was removed.

/// SeaORM-backed implementation of the gateway
pub mod sql;

use crate::core::{Individual, NewTransaction, Transaction, TransactionId};
use sea_orm::DbErr;
use std::future::Future;
use thiserror::Error;

pub use sql::SqlGateway;

/// Failure reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The remote store could not be reached
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// The request reached the store but failed in transit or execution
    #[error("transport failure: {0}")]
    Transport(String),

    /// The store refused the write
    #[error("rejected by remote store: {0}")]
    Rejected(String),

    /// A returned row could not be decoded into a transaction
    #[error("malformed row: {0}")]
    Malformed(String),
}

/// Convenience `Result` type for gateway calls
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

impl From<DbErr> for GatewayError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::Unavailable(err.to_string()),
            DbErr::RecordNotInserted | DbErr::Custom(_) => Self::Rejected(err.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Result of a delete request. Both variants count as success for the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A row was removed
    Deleted,
    /// No row had that id
    NotFound,
}

/// Contract for the remote table holding transaction rows.
///
/// Futures must be `Send` so loads can run as spawned tasks while the session
/// keeps handling input.
pub trait TransactionGateway: Send + Sync {
    /// All transactions for `owner`, ordered by date desc, then created_at desc, then id desc.
    fn query(
        &self,
        owner: Individual,
    ) -> impl Future<Output = GatewayResult<Vec<Transaction>>> + Send;

    /// Inserts a candidate; the store assigns `id` and `created_at`.
    fn insert(
        &self,
        candidate: NewTransaction,
    ) -> impl Future<Output = GatewayResult<Transaction>> + Send;

    /// Deletes the row with the given id, if any.
    fn delete_by_id(
        &self,
        id: TransactionId,
    ) -> impl Future<Output = GatewayResult<DeleteOutcome>> + Send;
}
