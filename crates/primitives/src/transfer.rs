//! The off-ledger record of a transfer that is being relayed.

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    errors::ParseError,
    events::ObservedTransfer,
    protocol::Protocol,
    types::{ChainId, MessageId, Timestamp},
};

/// The lifecycle state of a relayed transfer.
///
/// ```text
/// Pending -> Attested -> Completing -> Completed
///    |          |  ^          |
///    |          |  +----------+ (retryable submission failure)
///    v          v             v
///  Failed/Cancelled        Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    /// Waiting for the attestation service to attest the message.
    Pending,

    /// An attestation is available and the message can be submitted.
    Attested,

    /// A submission to the destination chain is (or may be) in flight.
    Completing,

    /// The message has been received on the destination chain.
    Completed,

    /// The transfer could not be completed automatically.
    Failed,

    /// An operator stopped automatic processing of the transfer.
    Cancelled,
}

impl TransferState {
    /// Every state, in lifecycle order.
    pub const ALL: [TransferState; 6] = [
        TransferState::Pending,
        TransferState::Attested,
        TransferState::Completing,
        TransferState::Completed,
        TransferState::Failed,
        TransferState::Cancelled,
    ];

    /// The states that the relayer still has work to do for.
    pub const ACTIVE: [TransferState; 3] = [
        TransferState::Pending,
        TransferState::Attested,
        TransferState::Completing,
    ];

    /// Whether the pipeline will never advance a record in this state again.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferState::Completed | TransferState::Failed | TransferState::Cancelled
        )
    }

    /// The name of the state as persisted.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransferState::Pending => "pending",
            TransferState::Attested => "attested",
            TransferState::Completing => "completing",
            TransferState::Completed => "completed",
            TransferState::Failed => "failed",
            TransferState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransferState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseError::UnknownState(s.to_string()))
    }
}

/// Why a transfer ended up in [`TransferState::Failed`] or [`TransferState::Cancelled`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// No attestation was produced before the timeout ceiling.
    AttestationTimeout,

    /// Every submission attempt failed.
    SubmissionExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The error of the last attempt.
        last_error: String,
    },

    /// An operator cancelled the transfer.
    CancelledByOperator,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::AttestationTimeout => f.write_str("AttestationTimeout"),
            FailureReason::SubmissionExhausted {
                attempts,
                last_error,
            } => write!(f, "DestinationRevert after {attempts} attempts: {last_error}"),
            FailureReason::CancelledByOperator => f.write_str("cancelled by operator"),
        }
    }
}

/// One transfer tracked by the relayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Primary key.
    pub message_id: MessageId,

    /// Protocol the transfer was dispatched through.
    pub protocol: Protocol,

    /// Chain the transfer originated from.
    pub source_chain: ChainId,

    /// Chain the transfer is delivered to.
    pub dest_chain: ChainId,

    /// Token sent on the source chain.
    pub source_token: Address,

    /// Token delivered on the destination chain.
    pub dest_token: Address,

    /// Amount sent.
    pub amount: U256,

    /// Account credited on the destination chain.
    pub recipient: Address,

    /// Current lifecycle state.
    pub state: TransferState,

    /// The protocol message to submit. Known once observed or attested.
    pub message: Option<Bytes>,

    /// The attestation over [`Self::message`].
    pub attestation: Option<Bytes>,

    /// Set when the record is failed or cancelled.
    pub failure_reason: Option<FailureReason>,

    /// When the record was created (or last resubmitted by an operator).
    pub created_at: Timestamp,

    /// When the last poll or submission was attempted.
    pub last_attempt_at: Option<Timestamp>,

    /// Number of attempts made in the current state.
    pub attempt_count: u32,

    /// Incremented on every committed transition; used to guard concurrent writers.
    pub version: u64,
}

impl TransferRecord {
    /// Creates a fresh [`TransferState::Pending`] record from an observed dispatch event.
    pub fn pending(observed: &ObservedTransfer, now: Timestamp) -> Self {
        let event = &observed.event;

        Self {
            message_id: event.message_id,
            protocol: event.protocol,
            source_chain: observed.source_chain,
            dest_chain: event.dest_chain,
            source_token: event.source_token,
            dest_token: event.dest_token,
            amount: event.amount,
            recipient: event.recipient,
            state: TransferState::Pending,
            message: observed.message.clone(),
            attestation: None,
            failure_reason: None,
            created_at: now,
            last_attempt_at: None,
            attempt_count: 0,
            version: 0,
        }
    }

    /// Whether the record is in a terminal state.
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TransferInitiated;

    #[test]
    fn state_names_parse_back() {
        for state in TransferState::ALL {
            assert_eq!(state.as_str().parse::<TransferState>(), Ok(state));
        }

        assert!("unknown".parse::<TransferState>().is_err());
    }

    #[test]
    fn terminal_and_active_states_partition_all_states() {
        for state in TransferState::ALL {
            assert_ne!(
                state.is_terminal(),
                TransferState::ACTIVE.contains(&state),
                "{state} must be either terminal or active"
            );
        }
    }

    #[test]
    fn pending_record_copies_event_fields() {
        let observed = ObservedTransfer {
            source_chain: 8453,
            event: TransferInitiated {
                message_id: MessageId::default(),
                sender: Address::repeat_byte(1),
                source_token: Address::repeat_byte(2),
                dest_token: Address::repeat_byte(3),
                amount: U256::from(5u8),
                dest_chain: 42161,
                recipient: Address::repeat_byte(4),
                protocol: Protocol::BurnMint,
            },
            message: None,
        };

        let record = TransferRecord::pending(&observed, 1_000);

        assert_eq!(record.state, TransferState::Pending);
        assert_eq!(record.source_chain, 8453);
        assert_eq!(record.dest_chain, 42161);
        assert_eq!(record.recipient, Address::repeat_byte(4));
        assert_eq!(record.created_at, 1_000);
        assert_eq!(record.version, 0);
    }

    #[test]
    fn failure_reason_serializes_with_tag() {
        let reason = FailureReason::SubmissionExhausted {
            attempts: 3,
            last_error: "nonce mismatch".to_string(),
        };
        let json = serde_json::to_string(&reason).unwrap();

        assert_eq!(
            json,
            r#"{"kind":"submission_exhausted","detail":{"attempts":3,"last_error":"nonce mismatch"}}"#
        );
        assert_eq!(serde_json::from_str::<FailureReason>(&json).unwrap(), reason);
    }
}
