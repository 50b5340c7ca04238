//! The duties that the relayer must perform to drive a transfer forward.

use stable_router_primitives::{
    types::{ChainId, MessageId},
    Bytes,
};

/// The duties emitted by the transfer state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferDuty {
    /// Query the attestation service again once the backoff for `attempt` has elapsed.
    PollAttestation {
        /// The message to poll for.
        message_id: MessageId,
        /// Number of polls made so far.
        attempt: u32,
    },

    /// Claim the record for submission once the backoff for `attempt` has elapsed.
    ClaimSubmission {
        /// The message to submit.
        message_id: MessageId,
        /// Number of submissions made so far.
        attempt: u32,
    },

    /// Submit the attested message to the destination chain now.
    SubmitCompletion {
        /// The message being submitted.
        message_id: MessageId,
        /// The chain to submit to.
        dest_chain: ChainId,
        /// The protocol message.
        message: Bytes,
        /// The attestation over `message`.
        attestation: Bytes,
    },
}

impl TransferDuty {
    /// The message the duty refers to.
    pub const fn message_id(&self) -> &MessageId {
        match self {
            TransferDuty::PollAttestation { message_id, .. }
            | TransferDuty::ClaimSubmission { message_id, .. }
            | TransferDuty::SubmitCompletion { message_id, .. } => message_id,
        }
    }
}
