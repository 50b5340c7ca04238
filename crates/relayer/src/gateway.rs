//! JSON-RPC client of the destination gateway.

use std::time::Duration;

use async_trait::async_trait;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use stable_router_primitives::{types::ChainId, Bytes};
use stable_router_rpc::{traits::DestinationGatewayApiClient, types::RpcReceiveOutcome};
use tracing::debug;

use crate::destination::{DestinationError, DestinationReceiver, ReceiveOutcome};

/// A [`DestinationReceiver`] that forwards messages to a signing gateway over JSON-RPC.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: HttpClient,
}

impl GatewayClient {
    /// Creates a client for the gateway at `url`.
    pub fn new(url: &str, request_timeout: Duration) -> Result<Self, DestinationError> {
        let client = HttpClientBuilder::default()
            .request_timeout(request_timeout)
            .build(url)
            .map_err(|e| DestinationError::Transport(format!("failed to build client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DestinationReceiver for GatewayClient {
    async fn receive_message(
        &self,
        dest_chain: ChainId,
        message: &Bytes,
        attestation: &Bytes,
    ) -> Result<ReceiveOutcome, DestinationError> {
        let outcome = self
            .client
            .receive_message(dest_chain, message.clone(), attestation.clone())
            .await
            .map_err(|e| DestinationError::Transport(e.to_string()))?;

        debug!(%dest_chain, ?outcome, "gateway answered");

        Ok(match outcome {
            RpcReceiveOutcome::Received => ReceiveOutcome::Received,
            RpcReceiveOutcome::AlreadyProcessed => ReceiveOutcome::AlreadyProcessed,
            RpcReceiveOutcome::Reverted { reason } => ReceiveOutcome::Reverted(reason),
        })
    }
}
