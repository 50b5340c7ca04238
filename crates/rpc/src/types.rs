//! Types for the RPC server.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stable_router_primitives::{
    protocol::Protocol,
    transfer::{TransferRecord, TransferState},
    types::{ChainId, MessageId, Timestamp},
    Address, U256,
};

/// The lifecycle status of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RpcTransferStatus {
    /// Waiting for the attestation.
    Pending,

    /// Attested and waiting for submission.
    Attested,

    /// Submitted to the destination chain.
    Completing,

    /// Received on the destination chain.
    Completed,

    /// Could not be completed automatically.
    Failed {
        /// Reason for the failure.
        reason: String,
    },

    /// Stopped by an operator.
    Cancelled {
        /// Reason for the cancellation.
        reason: String,
    },
}

impl From<&TransferRecord> for RpcTransferStatus {
    fn from(record: &TransferRecord) -> Self {
        let reason = || {
            record
                .failure_reason
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        };

        match record.state {
            TransferState::Pending => Self::Pending,
            TransferState::Attested => Self::Attested,
            TransferState::Completing => Self::Completing,
            TransferState::Completed => Self::Completed,
            TransferState::Failed => Self::Failed { reason: reason() },
            TransferState::Cancelled => Self::Cancelled { reason: reason() },
        }
    }
}

/// Details of a tracked transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcTransferInfo {
    /// The protocol-assigned message identifier.
    pub message_id: MessageId,

    /// Status of the transfer.
    pub status: RpcTransferStatus,

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

    /// Whether an attestation has been stored for the message.
    pub has_attestation: bool,

    /// When the relayer started tracking the transfer (unix millis).
    pub created_at: Timestamp,

    /// When the last poll or submission was attempted (unix millis).
    pub last_attempt_at: Option<Timestamp>,

    /// Number of attempts made in the current state.
    pub attempt_count: u32,
}

impl From<&TransferRecord> for RpcTransferInfo {
    fn from(record: &TransferRecord) -> Self {
        Self {
            message_id: record.message_id,
            status: RpcTransferStatus::from(record),
            protocol: record.protocol,
            source_chain: record.source_chain,
            dest_chain: record.dest_chain,
            source_token: record.source_token,
            dest_token: record.dest_token,
            amount: record.amount,
            recipient: record.recipient,
            has_attestation: record.attestation.is_some(),
            created_at: record.created_at,
            last_attempt_at: record.last_attempt_at,
            attempt_count: record.attempt_count,
        }
    }
}

/// Aggregate counts over the tracked transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcTransferStats {
    /// Number of transfers per state.
    pub counts: BTreeMap<TransferState, u64>,

    /// Number of transfers across all states.
    pub total: u64,

    /// Sum of the amounts of completed transfers.
    pub completed_volume: U256,
}

/// What happened to an observed dispatch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RpcObserveOutcome {
    /// The transfer is now tracked.
    Tracked {
        /// The tracked message.
        message_id: MessageId,
    },

    /// The transfer was already tracked.
    Duplicate {
        /// The tracked message.
        message_id: MessageId,
    },

    /// The transfer is completed by its protocol without the relayer.
    Ignored {
        /// Why the relayer does not track the transfer.
        reason: String,
    },
}

/// The outcome of a `receiveMessage` call on the destination chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RpcReceiveOutcome {
    /// The message was received and the tokens minted.
    Received,

    /// The message had already been received.
    AlreadyProcessed,

    /// The call reverted.
    Reverted {
        /// The revert reason.
        reason: String,
    },
}
