//! The interface of the destination chain's message receiver.

use std::fmt::Debug;

use async_trait::async_trait;
use stable_router_primitives::{types::ChainId, Bytes};
use thiserror::Error;

/// The outcome of `receiveMessage(message, attestation)` on the destination chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// The message was received.
    Received,

    /// The message had been received before. This is as good as [`ReceiveOutcome::Received`].
    AlreadyProcessed,

    /// The call reverted with the given reason.
    Reverted(String),
}

/// The call could not be made or its outcome is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    /// The transport to the destination chain failed.
    #[error("transport: {0}")]
    Transport(String),
}

/// Delivers attested messages to destination chains.
#[async_trait]
pub trait DestinationReceiver: Debug + Send + Sync {
    /// Calls `receiveMessage(message, attestation)` on `dest_chain`.
    async fn receive_message(
        &self,
        dest_chain: ChainId,
        message: &Bytes,
        attestation: &Bytes,
    ) -> Result<ReceiveOutcome, DestinationError>;
}
