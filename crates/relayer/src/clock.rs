//! Sources of the current time.

use std::{
    fmt::Debug,
    time::{SystemTime, UNIX_EPOCH},
};

use stable_router_primitives::types::{duration_millis, Timestamp};

/// Provides the time at which events are observed.
pub trait Clock: Debug + Send + Sync {
    /// The current time in milliseconds since the unix epoch.
    fn now(&self) -> Timestamp;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(duration_millis)
            .unwrap_or_default()
    }
}

/// A clock that follows tokio's time, which can be paused and advanced in tests.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
    origin_millis: Timestamp,
}

impl TokioClock {
    /// Creates a clock that reads `origin_millis` now.
    pub fn starting_at(origin_millis: Timestamp) -> Self {
        Self {
            origin: tokio::time::Instant::now(),
            origin_millis,
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        self.origin_millis
            .saturating_add(duration_millis(self.origin.elapsed()))
    }
}
