//! The interface of the attestation service.

use std::fmt::Debug;

use async_trait::async_trait;
use stable_router_primitives::{types::MessageId, Bytes};
use thiserror::Error;

/// The attestation state of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationStatus {
    /// The message is not attested yet.
    Pending,

    /// The message is attested.
    Complete {
        /// The attested message, if the service returns it. Otherwise the message captured by
        /// the observer is submitted.
        message: Option<Bytes>,

        /// The attestation over the message.
        attestation: Bytes,
    },
}

/// Errors returned by an [`AttestationService`].
///
/// All of them are transient from the relayer's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttestationError {
    /// The service could not be reached or answered with an error status.
    #[error("transport: {0}")]
    Transport(String),

    /// The service answered with a body that cannot be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A service that attests burn/mint messages.
#[async_trait]
pub trait AttestationService: Debug + Send + Sync {
    /// Fetches the attestation of the message with the given id.
    async fn get_attestation(
        &self,
        message_id: MessageId,
    ) -> Result<AttestationStatus, AttestationError>;
}
