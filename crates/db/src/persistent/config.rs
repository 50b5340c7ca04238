//! Configuration of the SQLite store.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_BACKOFF_PERIOD, DEFAULT_BUSY_TIMEOUT, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_RETRY_COUNT,
};

/// Connection and retry settings of the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    max_retry_count: usize,
    backoff_period: Duration,
    max_connections: u32,
    busy_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_retry_count: DEFAULT_MAX_RETRY_COUNT,
            backoff_period: DEFAULT_BACKOFF_PERIOD,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl DbConfig {
    /// Sets the number of retries of a transiently failing operation.
    pub fn with_max_retry_count(self, count: usize) -> Self {
        Self {
            max_retry_count: count,
            ..self
        }
    }

    /// Sets the wait between retries.
    pub fn with_backoff_period(self, period: Duration) -> Self {
        Self {
            backoff_period: period,
            ..self
        }
    }

    /// Sets the size of the connection pool.
    pub fn with_max_connections(self, max_connections: u32) -> Self {
        Self {
            max_connections,
            ..self
        }
    }

    /// The number of retries of a transiently failing operation.
    pub const fn max_retry_count(&self) -> usize {
        self.max_retry_count
    }

    /// The wait between retries.
    pub const fn backoff_period(&self) -> Duration {
        self.backoff_period
    }

    /// The size of the connection pool.
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// How long a connection waits on a locked database.
    pub const fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}
