//! Errors related to the state transitions in the Transfer State Machine.

use stable_router_primitives::transfer::TransferState;
use thiserror::Error;

/// Errors that can occur in the Transfer State Machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TSMError {
    /// An event was received that makes no sense in the current state.
    #[error("received invalid event {event} in state {state}; reason: {reason:?}")]
    InvalidEvent {
        /// The state in which the event was received.
        state: TransferState,
        /// The invalid event that was received.
        event: String,
        /// The reason for the invalidity.
        reason: Option<String>,
    },

    /// An event was understood but rejected in the current state.
    ///
    /// This happens, for example, when an operator tries to cancel a submission that may already
    /// be in flight.
    #[error("event rejected in state: {state}, reason: {reason}")]
    Rejected {
        /// The state in which the event was rejected.
        state: TransferState,
        /// The reason for the rejection.
        reason: String,
    },
}

/// The result type for operations in the Transfer State Machine.
pub type TSMResult<T> = Result<T, TSMError>;
