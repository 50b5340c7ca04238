use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use stable_router_db::DbConfig;

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_WORKER_CONCURRENCY,
};

/// The configuration values that dictate how the relayer runs.
///
/// Unlike the params, nothing here changes what a transfer goes through, only where the relayer
/// keeps its data and whom it talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The directory to store all the data in.
    pub datadir: PathBuf,

    /// The RPC server addr for the relayer.
    pub rpc_addr: String,

    /// The configuration for the sqlite3 database.
    #[serde(default)]
    pub db: DbConfig,

    /// Where attestations are fetched from.
    pub attestation_service: AttestationServiceConfig,

    /// The gateway that submits messages on the destination chains.
    pub gateway: GatewayConfig,

    /// Maximum number of transfers driven at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// The number of runtime worker threads.
    pub num_threads: Option<u8>,

    /// The stack size of the runtime worker threads.
    pub thread_stack_size: Option<usize>,

    /// How long running workers get to stop after a shutdown signal.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AttestationServiceConfig {
    /// Base URL of the attestation API.
    pub url: String,

    /// Timeout of the underlying HTTP client. Each poll is also bounded by the params.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GatewayConfig {
    /// JSON-RPC endpoint of the gateway.
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

const fn default_concurrency() -> usize {
    DEFAULT_WORKER_CONCURRENCY
}

const fn default_shutdown_timeout() -> Duration {
    DEFAULT_SHUTDOWN_TIMEOUT
}

const fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_toml() {
        let config = r#"
            datadir = ".data"
            rpc_addr = "localhost:5678"
            concurrency = 16
            num_threads = 2
            shutdown_timeout = { secs = 10, nanos = 0 }

            [db]
            max_retry_count = 3
            backoff_period = { secs = 1, nanos = 0 }

            [attestation_service]
            url = "https://attestations.example.com"

            [gateway]
            url = "http://localhost:8545"
            request_timeout = { secs = 60, nanos = 0 }
        "#;

        let config = toml::from_str::<Config>(config);
        assert!(
            config.is_ok(),
            "must be able to deserialize config from toml but got: {}",
            config.unwrap_err()
        );

        let config = config.unwrap();
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.db.max_retry_count(), 3);
        assert_eq!(
            config.attestation_service.request_timeout,
            DEFAULT_REQUEST_TIMEOUT
        );
        assert_eq!(config.gateway.request_timeout, Duration::from_secs(60));

        let serialized = toml::to_string(&config).unwrap();
        let deserialized = toml::from_str::<Config>(&serialized).unwrap();
        assert_eq!(
            deserialized, config,
            "must be able to serialize and deserialize config to toml"
        );
    }

    #[test]
    fn optional_values_fall_back_to_defaults() {
        let config = r#"
            datadir = ".data"
            rpc_addr = "localhost:5678"

            [attestation_service]
            url = "https://attestations.example.com"

            [gateway]
            url = "http://localhost:8545"
        "#;

        let config = toml::from_str::<Config>(config).unwrap();

        assert_eq!(config.db, DbConfig::default());
        assert_eq!(config.concurrency, DEFAULT_WORKER_CONCURRENCY);
        assert_eq!(config.shutdown_timeout, DEFAULT_SHUTDOWN_TIMEOUT);
        assert_eq!(config.num_threads, None);
    }
}
