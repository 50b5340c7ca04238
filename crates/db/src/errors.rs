//! Errors returned by the transfer stores.

use stable_router_primitives::{transfer::TransferState, types::MessageId};
use thiserror::Error;

use crate::persistent::errors::StorageError;

/// Errors returned by a [`TransferStore`](crate::TransferStore).
#[derive(Debug, Error)]
pub enum DbError {
    /// The SQLite store failed.
    #[error("sqlite: {0}")]
    Storage(#[from] StorageError),

    /// The record moved on since it was read. The caller lost the race and must not retry the
    /// same transition.
    #[error("stale transition for {message_id} from {expected_state}@{expected_version}")]
    StaleTransition {
        /// The record.
        message_id: MessageId,
        /// The state the caller read.
        expected_state: TransferState,
        /// The version the caller read.
        expected_version: u64,
    },

    /// No record exists for the message.
    #[error("unknown transfer: {0}")]
    UnknownTransfer(MessageId),

    /// The proposed record is not a valid successor of the expected one.
    #[error("invalid update: {0}")]
    InvalidUpdate(String),
}

impl DbError {
    /// Whether the operation may succeed if attempted again unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            DbError::Storage(StorageError::Driver(err)) => match err {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
                // SQLITE_BUSY and SQLITE_LOCKED
                sqlx::Error::Database(db_err) => {
                    matches!(db_err.code().as_deref(), Some("5") | Some("6"))
                }
                _ => false,
            },
            _ => false,
        }
    }
}

/// The result type of store operations.
pub type DbResult<T> = Result<T, DbError>;
