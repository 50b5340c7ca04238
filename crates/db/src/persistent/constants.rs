//! Defaults of the SQLite store.

use std::time::Duration;

/// Attempts made at an operation that fails with a transient error before giving up.
pub const DEFAULT_MAX_RETRY_COUNT: usize = 5;

/// Wait between two attempts at an operation.
pub const DEFAULT_BACKOFF_PERIOD: Duration = Duration::from_millis(200);

/// Connections kept in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// How long SQLite waits on a locked database before returning `SQLITE_BUSY`.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
