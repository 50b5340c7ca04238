//! The stable relayer completes burn/mint transfers dispatched by the stable router.
//!
//! It tracks transfers fed to it over RPC, polls the attestation service until each message is
//! attested and hands attested messages to the destination gateway.

use std::{fs, path::Path};

use anyhow::Context;
use clap::Parser;
use config::Config;
use constants::{DEFAULT_THREAD_COUNT, DEFAULT_THREAD_STACK_SIZE};
use serde::de::DeserializeOwned;
use stable_router_common::{logging, logging::LoggerConfig};
use stable_router_params::RelayerParams;
use tokio::runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

mod args;
mod bootstrap;
mod config;
mod rpc_server;

mod constants;

fn main() -> anyhow::Result<()> {
    let mut logger_config = LoggerConfig::with_base_name("stable-relayer");
    if let Some(url) = logging::get_otlp_url_from_env() {
        logger_config.set_otlp_url(url);
    }
    logging::init(logger_config);

    let cli = args::Cli::parse();
    info!(params = ?cli.params, config = ?cli.config, "starting relayer");

    let params = parse_toml::<RelayerParams>(&cli.params)?;
    params
        .validate()
        .with_context(|| format!("invalid params at {}", cli.params.display()))?;
    let config = parse_toml::<Config>(&cli.config)?;

    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(config.num_threads.unwrap_or(DEFAULT_THREAD_COUNT).into())
        .thread_stack_size(
            config
                .thread_stack_size
                .unwrap_or(DEFAULT_THREAD_STACK_SIZE),
        )
        .enable_all()
        .build()
        .context("must be able to create runtime")?;

    runtime.block_on(async move {
        let cancel = CancellationToken::new();
        listen_for_shutdown(cancel.clone());

        bootstrap::bootstrap(params, config, cancel).await
    })?;

    info!("relayer shutdown complete");

    Ok(())
}

/// Cancels `cancel` on the first interrupt signal.
fn listen_for_shutdown(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received interrupt, shutting down"),
            Err(err) => warn!(%err, "could not listen for interrupts, shutting down"),
        }

        cancel.cancel();
    });
}

/// Reads and parses a TOML file from the given path into the given type `T`.
fn parse_toml<T>(path: impl AsRef<Path>) -> anyhow::Result<T>
where
    T: std::fmt::Debug + DeserializeOwned,
{
    let path = path.as_ref();

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read TOML file at {}", path.display()))?;
    trace!(?contents, "read file");

    let parsed = toml::from_str::<T>(&contents)
        .with_context(|| format!("failed to parse TOML file at {}", path.display()))?;
    debug!(?parsed, "parsed TOML file");

    Ok(parsed)
}
