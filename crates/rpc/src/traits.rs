//! Traits for the RPC server.

use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use stable_router_primitives::{
    events::ObservedTransfer,
    transfer::TransferState,
    types::{ChainId, MessageId},
    Bytes,
};

use crate::types::{RpcObserveOutcome, RpcReceiveOutcome, RpcTransferInfo, RpcTransferStats};

/// RPCs related to information about the relayer itself.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "stablerouter"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "stablerouter"))]
pub trait StableRouterControlApi {
    /// Get the uptime of the relayer in seconds assuming the clock is strictly monotonically
    /// increasing.
    #[method(name = "uptime")]
    async fn get_uptime(&self) -> RpcResult<u64>;
}

/// RPCs that expose the transfers tracked by the relayer.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "stablerouter"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "stablerouter"))]
pub trait StableRouterMonitoringApi {
    /// Get the status of a single transfer.
    #[method(name = "transferStatus")]
    async fn get_transfer_status(&self, message_id: MessageId)
        -> RpcResult<Option<RpcTransferInfo>>;

    /// Get every tracked transfer, optionally only those in `state`, oldest first.
    #[method(name = "transfers")]
    async fn get_transfers(&self, state: Option<TransferState>) -> RpcResult<Vec<RpcTransferInfo>>;

    /// Get the number of transfers per state and the completed volume.
    #[method(name = "stats")]
    async fn get_stats(&self) -> RpcResult<RpcTransferStats>;
}

/// RPCs that change what the relayer works on.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "stablerouter"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "stablerouter"))]
pub trait StableRouterOperatorApi {
    /// Feed a dispatch event observed on a source chain.
    #[method(name = "monitorTransfer")]
    async fn monitor_transfer(&self, observed: ObservedTransfer) -> RpcResult<RpcObserveOutcome>;

    /// Stop automatic processing of a pending or attested transfer.
    #[method(name = "cancelTransfer")]
    async fn cancel_transfer(&self, message_id: MessageId) -> RpcResult<RpcTransferInfo>;

    /// Hand a failed or cancelled transfer back to the pipeline.
    #[method(name = "resubmitTransfer")]
    async fn resubmit_transfer(&self, message_id: MessageId) -> RpcResult<RpcTransferInfo>;

    /// Attest a pending transfer with a message and attestation obtained outside the relayer,
    /// and hand it to the submitter.
    #[method(name = "supplyAttestation")]
    async fn supply_attestation(
        &self,
        message_id: MessageId,
        message: Bytes,
        attestation: Bytes,
    ) -> RpcResult<RpcTransferInfo>;
}

/// RPCs of the gateway that signs and broadcasts destination chain transactions.
///
/// Chain connectivity and key management live behind this gateway.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "gateway"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "gateway"))]
pub trait DestinationGatewayApi {
    /// Call `receiveMessage(message, attestation)` on the message transmitter of `chain_id` and
    /// report the outcome once the transaction is final.
    #[method(name = "receiveMessage")]
    async fn receive_message(
        &self,
        chain_id: ChainId,
        message: Bytes,
        attestation: Bytes,
    ) -> RpcResult<RpcReceiveOutcome>;
}
