//! The events that are relevant to the Transfer State Machine.
//!
//! Every event carries the time at which it was observed so that transitions never consult a
//! clock themselves.

use std::fmt;

use stable_router_primitives::{types::Timestamp, Bytes};

/// The external events that affect the Transfer State Machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// A poll of the attestation service did not yield an attestation, either because the
    /// message is not attested yet or because the call failed.
    AttestationPending {
        /// When the poll finished.
        now: Timestamp,
    },

    /// The attestation service returned an attestation.
    AttestationReceived {
        /// The attested message.
        message: Bytes,
        /// The attestation.
        attestation: Bytes,
        /// When the attestation was received.
        now: Timestamp,
    },

    /// A worker is about to submit the message.
    SubmissionClaimed {
        /// When the claim was made.
        now: Timestamp,
    },

    /// The destination chain received the message.
    SubmissionSucceeded {
        /// When the receipt was observed.
        now: Timestamp,
    },

    /// The destination chain reported that the message was already received.
    AlreadyProcessed {
        /// When the revert was observed.
        now: Timestamp,
    },

    /// The submission reverted or could not be delivered.
    SubmissionFailed {
        /// The reason reported by the destination or the transport.
        reason: String,
        /// When the failure was observed.
        now: Timestamp,
    },

    /// An operator cancelled the transfer.
    Cancelled {
        /// When the cancellation was requested.
        now: Timestamp,
    },

    /// An operator asked for a failed or cancelled transfer to be processed again.
    Resubmitted {
        /// When the resubmission was requested.
        now: Timestamp,
    },
}

impl TransferEvent {
    /// When the event was observed.
    pub const fn now(&self) -> Timestamp {
        match self {
            TransferEvent::AttestationPending { now }
            | TransferEvent::AttestationReceived { now, .. }
            | TransferEvent::SubmissionClaimed { now }
            | TransferEvent::SubmissionSucceeded { now }
            | TransferEvent::AlreadyProcessed { now }
            | TransferEvent::SubmissionFailed { now, .. }
            | TransferEvent::Cancelled { now }
            | TransferEvent::Resubmitted { now } => *now,
        }
    }

    /// Whether the event can only originate from an operator rather than the pipeline.
    pub const fn is_operator_action(&self) -> bool {
        matches!(
            self,
            TransferEvent::Cancelled { .. } | TransferEvent::Resubmitted { .. }
        )
    }
}

impl fmt::Display for TransferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_str = match self {
            TransferEvent::AttestationPending { .. } => "AttestationPending",
            TransferEvent::AttestationReceived { .. } => "AttestationReceived",
            TransferEvent::SubmissionClaimed { .. } => "SubmissionClaimed",
            TransferEvent::SubmissionSucceeded { .. } => "SubmissionSucceeded",
            TransferEvent::AlreadyProcessed { .. } => "AlreadyProcessed",
            TransferEvent::SubmissionFailed { reason, .. } => {
                return write!(f, "SubmissionFailed ({reason})");
            }
            TransferEvent::Cancelled { .. } => "Cancelled",
            TransferEvent::Resubmitted { .. } => "Resubmitted",
        };

        f.write_str(event_str)
    }
}
