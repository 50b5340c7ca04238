//! Wires the store, the attestation and gateway clients, the scheduler and the RPC server.

use std::{fs, future::Future, path::Path, sync::Arc};

use anyhow::Context;
use attestation_relayer::{gateway::GatewayClient, iris::HttpAttestationClient, Relayer, Scheduler};
use stable_router_db::SqliteDb;
use stable_router_params::RelayerParams;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    config::Config,
    constants::DB_NAME,
    rpc_server::{start_rpc, RelayerRpc},
};

/// Runs the relayer until `cancel` fires or one of its services stops.
pub(crate) async fn bootstrap(
    params: RelayerParams,
    config: Config,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    info!("bootstrapping relayer");

    let db = init_database_handle(&config).await?;

    let attestations = HttpAttestationClient::new(
        &config.attestation_service.url,
        config.attestation_service.request_timeout,
    )
    .context("should be able to create the attestation client")?;
    info!(url = %config.attestation_service.url, "initialized the attestation client");

    let gateway = GatewayClient::new(&config.gateway.url, config.gateway.request_timeout)
        .context("should be able to create the gateway client")?;
    info!(url = %config.gateway.url, "initialized the gateway client");

    let relayer = Arc::new(Relayer::new(
        Arc::new(db),
        Arc::new(attestations),
        Arc::new(gateway),
        params,
    ));

    let (scheduler, scheduler_handle) = Scheduler::new(relayer.clone(), config.concurrency);
    let scheduler_run = scheduler.run(cancel.clone());
    let scheduler_task = spawn_until_cancelled(cancel.clone(), "scheduler", async move {
        scheduler_run
            .await
            .context("scheduler stopped with an error")
    });

    let rpc = RelayerRpc::new(relayer, scheduler_handle);
    let rpc_addr = config.rpc_addr.clone();
    let rpc_cancel = cancel.clone();
    let rpc_task = spawn_until_cancelled(cancel.clone(), "rpc server", async move {
        start_rpc(&rpc, &rpc_addr, rpc_cancel).await
    });

    cancel.cancelled().await;
    info!(timeout = ?config.shutdown_timeout, "stopping services");

    let stopped = tokio::time::timeout(config.shutdown_timeout, async {
        (scheduler_task.await, rpc_task.await)
    })
    .await;

    let Ok((scheduler, rpc)) = stopped else {
        warn!("services did not stop in time");
        return Ok(());
    };

    scheduler.context("scheduler panicked")??;
    rpc.context("rpc server panicked")??;

    Ok(())
}

/// Spawns a service that cancels every other service when it stops, for whatever reason.
fn spawn_until_cancelled(
    cancel: CancellationToken,
    name: &'static str,
    service: impl Future<Output = anyhow::Result<()>> + Send + 'static,
) -> JoinHandle<anyhow::Result<()>> {
    tokio::spawn(async move {
        let result = service.await;

        if let Err(err) = &result {
            error!(%name, ?err, "service failed");
        } else if !cancel.is_cancelled() {
            warn!(%name, "service stopped unexpectedly");
        }
        cancel.cancel();

        result
    })
}

async fn init_database_handle(config: &Config) -> anyhow::Result<SqliteDb> {
    let db_path = create_datadir(&config.datadir)?.join(DB_NAME);
    let url = format!("sqlite://{}", db_path.display());

    info!(action = "opening transfer store", %DB_NAME);
    SqliteDb::connect(&url, config.db.clone())
        .await
        .with_context(|| format!("should be able to open the database at {url}"))
}

fn create_datadir(datadir: &Path) -> anyhow::Result<&Path> {
    if !datadir.exists() {
        fs::create_dir_all(datadir)
            .with_context(|| format!("could not create datadir at {}", datadir.display()))?;
    }

    Ok(datadir)
}
