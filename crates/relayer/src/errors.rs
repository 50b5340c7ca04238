//! Errors raised by the relayer.

use relay_sm::errors::TSMError;
use stable_router_db::errors::DbError;
use stable_router_primitives::types::MessageId;
use thiserror::Error;

/// Errors that stop the relayer from acting on a transfer.
///
/// Failures of the attestation service and the destination chain are not among them. They are
/// absorbed by the poller and the submitter and only ever surface as state transitions.
#[derive(Debug, Error)]
pub enum RelayerError {
    /// The transfer store failed.
    #[error("store: {0}")]
    Store(#[from] DbError),

    /// The state machine refused the event.
    #[error("transition: {0}")]
    Transition(#[from] TSMError),

    /// No record exists for the message.
    #[error("unknown transfer: {0}")]
    UnknownTransfer(MessageId),

    /// The record changed while the action was being applied.
    #[error("transfer {0} was updated concurrently; retry the action")]
    ConcurrentUpdate(MessageId),

    /// The observed dispatch event contradicts the message emitted with it.
    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    /// The scheduler is no longer accepting work.
    #[error("scheduler stopped")]
    SchedulerStopped,
}

/// The result type of relayer operations.
pub type RelayerResult<T> = Result<T, RelayerError>;
