//! Delays between attestation polls and submission attempts.

use std::time::Duration;

use stable_router_params::{AttestationParams, SubmissionParams, WorkerParams};
use stable_router_primitives::types::ChainId;

/// `initial * 2^exponent`, capped at `max`.
pub fn exponential_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let factor = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);

    initial.saturating_mul(factor).min(max)
}

/// The wait before poll number `attempt + 1` of a message sent from `source_chain`.
///
/// The first poll happens immediately.
pub fn poll_delay(params: &AttestationParams, source_chain: ChainId, attempt: u32) -> Duration {
    match attempt {
        0 => Duration::ZERO,
        n => exponential_delay(
            params.initial_poll_interval,
            params.max_poll_interval(source_chain),
            n - 1,
        ),
    }
}

/// The wait before submission number `attempt + 1`.
///
/// The first submission happens immediately.
pub fn submit_delay(params: &SubmissionParams, attempt: u32) -> Duration {
    match attempt {
        0 => Duration::ZERO,
        n => exponential_delay(params.initial_backoff, params.max_backoff, n - 1),
    }
}

/// The wait before a worker is restarted after its `failures`-th consecutive failure.
pub fn restart_delay(params: &WorkerParams, failures: u32) -> Duration {
    exponential_delay(
        params.initial_restart_backoff,
        params.max_restart_backoff,
        failures.saturating_sub(1),
    )
}
