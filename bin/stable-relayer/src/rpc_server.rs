//! Bootstraps the RPC server of the relayer.

use std::{fmt, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use attestation_relayer::{observer::ObserveOutcome, Relayer, RelayerError, SchedulerHandle};
use chrono::{DateTime, Utc};
use jsonrpsee::{
    core::RpcResult,
    types::{ErrorCode, ErrorObjectOwned},
    RpcModule,
};
use stable_router_primitives::{
    events::ObservedTransfer, transfer::TransferState, types::MessageId, Bytes,
};
use stable_router_rpc::{
    traits::{
        StableRouterControlApiServer, StableRouterMonitoringApiServer,
        StableRouterOperatorApiServer,
    },
    types::{RpcObserveOutcome, RpcTransferInfo, RpcTransferStats},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// No transfer is tracked under the requested message id.
const TRANSFER_NOT_FOUND: i32 = -32001;

/// The transfer is in a state that does not allow the requested action.
const ACTION_REJECTED: i32 = -32002;

/// The transfer changed while the action was applied.
const CONCURRENT_UPDATE: i32 = -32003;

/// Serves the relayer RPCs on `rpc_addr` until `cancel` fires.
pub(crate) async fn start_rpc<T>(
    rpc_impl: &T,
    rpc_addr: &str,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    T: StableRouterControlApiServer
        + StableRouterMonitoringApiServer
        + StableRouterOperatorApiServer
        + Clone
        + Sync
        + Send,
{
    let mut rpc_module = RpcModule::new(rpc_impl.clone());

    let control_api = StableRouterControlApiServer::into_rpc(rpc_impl.clone());
    let monitoring_api = StableRouterMonitoringApiServer::into_rpc(rpc_impl.clone());
    let operator_api = StableRouterOperatorApiServer::into_rpc(rpc_impl.clone());

    rpc_module.merge(control_api).context("merge control api")?;
    rpc_module
        .merge(monitoring_api)
        .context("merge monitoring api")?;
    rpc_module.merge(operator_api).context("merge operator api")?;

    info!("starting relayer rpc server at {rpc_addr}");
    let rpc_server = jsonrpsee::server::ServerBuilder::new()
        .build(rpc_addr)
        .await
        .context("build relayer rpc server")?;

    let rpc_handle = rpc_server.start(rpc_module);
    debug!("relayer rpc server started");

    cancel.cancelled().await;
    info!("stopping rpc server");

    if rpc_handle.stop().is_err() {
        warn!("rpc server already stopped");
    }
    rpc_handle.stopped().await;

    Ok(())
}

/// The RPC surface over a running relayer.
#[derive(Clone)]
pub(crate) struct RelayerRpc {
    /// Node start time.
    start_time: DateTime<Utc>,

    /// The relayer whose transfers are served.
    relayer: Arc<Relayer>,

    /// Where newly tracked and resubmitted transfers are handed to be driven.
    scheduler: SchedulerHandle,
}

impl RelayerRpc {
    /// Create a new instance of [`RelayerRpc`].
    pub(crate) fn new(relayer: Arc<Relayer>, scheduler: SchedulerHandle) -> Self {
        Self {
            start_time: Utc::now(),
            relayer,
            scheduler,
        }
    }

    fn schedule(&self, message_id: MessageId) -> RpcResult<()> {
        self.scheduler.schedule(message_id).map_err(to_rpc_error)
    }
}

#[async_trait]
impl StableRouterControlApiServer for RelayerRpc {
    async fn get_uptime(&self) -> RpcResult<u64> {
        let current_time = Utc::now().timestamp();
        let start_time = self.start_time.timestamp();

        // The user might care about their system time being incorrect.
        if current_time < start_time {
            return Err(rpc_error(
                ErrorCode::InternalError.code(),
                "system time may be inaccurate",
                current_time.saturating_sub(start_time),
            ));
        }

        Ok(current_time.abs_diff(start_time))
    }
}

#[async_trait]
impl StableRouterMonitoringApiServer for RelayerRpc {
    async fn get_transfer_status(
        &self,
        message_id: MessageId,
    ) -> RpcResult<Option<RpcTransferInfo>> {
        let record = self
            .relayer
            .store()
            .get_transfer(message_id)
            .await
            .map_err(|e| to_rpc_error(e.into()))?;

        Ok(record.as_ref().map(RpcTransferInfo::from))
    }

    async fn get_transfers(
        &self,
        state: Option<TransferState>,
    ) -> RpcResult<Vec<RpcTransferInfo>> {
        let store = self.relayer.store();
        let records = match state {
            Some(state) => store.transfers_in_states(&[state]).await,
            None => store.all_transfers().await,
        }
        .map_err(|e| to_rpc_error(e.into()))?;

        Ok(records.iter().map(RpcTransferInfo::from).collect())
    }

    async fn get_stats(&self) -> RpcResult<RpcTransferStats> {
        let stats = self
            .relayer
            .store()
            .transfer_stats()
            .await
            .map_err(|e| to_rpc_error(e.into()))?;

        Ok(RpcTransferStats {
            total: stats.total(),
            counts: stats.counts,
            completed_volume: stats.completed_volume,
        })
    }
}

#[async_trait]
impl StableRouterOperatorApiServer for RelayerRpc {
    async fn monitor_transfer(&self, observed: ObservedTransfer) -> RpcResult<RpcObserveOutcome> {
        let outcome = self
            .relayer
            .observe(&observed)
            .await
            .map_err(to_rpc_error)?;

        Ok(match outcome {
            ObserveOutcome::Tracked(message_id) => {
                self.schedule(message_id)?;
                RpcObserveOutcome::Tracked { message_id }
            }
            ObserveOutcome::Duplicate(message_id) => RpcObserveOutcome::Duplicate { message_id },
            ObserveOutcome::Ignored(protocol) => RpcObserveOutcome::Ignored {
                reason: format!("{protocol} transfers complete without an attestation"),
            },
        })
    }

    async fn cancel_transfer(&self, message_id: MessageId) -> RpcResult<RpcTransferInfo> {
        let record = self
            .relayer
            .cancel(message_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(RpcTransferInfo::from(&record))
    }

    async fn resubmit_transfer(&self, message_id: MessageId) -> RpcResult<RpcTransferInfo> {
        let record = self
            .relayer
            .resubmit(message_id)
            .await
            .map_err(to_rpc_error)?;

        self.schedule(message_id)?;

        Ok(RpcTransferInfo::from(&record))
    }

    async fn supply_attestation(
        &self,
        message_id: MessageId,
        message: Bytes,
        attestation: Bytes,
    ) -> RpcResult<RpcTransferInfo> {
        let record = self
            .relayer
            .supply_attestation(message_id, message, attestation)
            .await
            .map_err(to_rpc_error)?;

        self.schedule(message_id)?;

        Ok(RpcTransferInfo::from(&record))
    }
}

/// Maps a relayer error to the RPC error returned for it.
fn to_rpc_error(err: RelayerError) -> ErrorObjectOwned {
    match &err {
        RelayerError::UnknownTransfer(message_id) => {
            rpc_error(TRANSFER_NOT_FOUND, "transfer not found", message_id)
        }
        RelayerError::Transition(reason) => {
            rpc_error(ACTION_REJECTED, "action rejected", reason)
        }
        RelayerError::ConcurrentUpdate(message_id) => {
            rpc_error(CONCURRENT_UPDATE, "transfer updated concurrently", message_id)
        }
        RelayerError::InvalidObservation(reason) => rpc_error(
            ErrorCode::InvalidParams.code(),
            "invalid observation",
            reason,
        ),
        RelayerError::Store(_) | RelayerError::SchedulerStopped => {
            warn!(%err, "rpc request failed");
            rpc_error(ErrorCode::InternalError.code(), "internal error", &err)
        }
    }
}

/// Returns an [`ErrorObjectOwned`] with the given code, message, and data.
fn rpc_error<T: fmt::Display>(code: i32, message: &str, data: T) -> ErrorObjectOwned {
    ErrorObjectOwned::owned::<_>(code, message, Some(data.to_string()))
}
