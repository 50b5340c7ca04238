//! Parameters that control how the relayer polls for attestations and submits messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stable_router_primitives::{protocol::LatencyClass, types::ChainId};

use crate::{
    default::{
        ATTESTATION_CALL_TIMEOUT, ATTESTATION_TIMEOUT, FAST_MAX_POLL_INTERVAL,
        INITIAL_POLL_INTERVAL, INITIAL_RESTART_BACKOFF, INITIAL_SUBMIT_BACKOFF,
        MAX_RESTART_BACKOFF, MAX_SUBMIT_ATTEMPTS, MAX_SUBMIT_BACKOFF, STANDARD_MAX_POLL_INTERVAL,
        SUBMIT_CALL_TIMEOUT, SUBMIT_CLAIM_TIMEOUT,
    },
    errors::ParamsError,
};

/// The full set of relayer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelayerParams {
    /// Attestation polling parameters.
    #[serde(default)]
    pub attestation: AttestationParams,

    /// Destination submission parameters.
    #[serde(default)]
    pub submission: SubmissionParams,

    /// Worker supervision parameters.
    #[serde(default)]
    pub worker: WorkerParams,
}

impl RelayerParams {
    /// Checks the values that depend on each other.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let SubmissionParams {
            max_attempts,
            call_timeout,
            claim_timeout,
            ..
        } = self.submission;

        if claim_timeout <= call_timeout {
            return Err(ParamsError::ClaimTimeoutTooShort {
                claim_timeout,
                call_timeout,
            });
        }

        if max_attempts == 0 {
            return Err(ParamsError::NoSubmitAttempts);
        }

        if self.attestation.initial_poll_interval.is_zero() {
            return Err(ParamsError::ZeroPollInterval);
        }

        Ok(())
    }
}

/// Parameters for polling the attestation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttestationParams {
    /// Interval before the first re-poll. Doubles on every unsuccessful poll.
    pub initial_poll_interval: Duration,

    /// Maximum poll interval for sources with [`LatencyClass::Fast`].
    pub fast_max_poll_interval: Duration,

    /// Maximum poll interval for sources with [`LatencyClass::Standard`].
    pub standard_max_poll_interval: Duration,

    /// Hard ceiling, measured from record creation, after which the transfer is failed with
    /// `AttestationTimeout`.
    pub timeout: Duration,

    /// Timeout of a single call to the attestation service.
    pub call_timeout: Duration,

    /// Source chains whose messages are attested on the standard (hard finality) path. Every
    /// other chain is treated as fast.
    pub standard_finality_chains: Vec<ChainId>,
}

impl Default for AttestationParams {
    fn default() -> Self {
        Self {
            initial_poll_interval: INITIAL_POLL_INTERVAL,
            fast_max_poll_interval: FAST_MAX_POLL_INTERVAL,
            standard_max_poll_interval: STANDARD_MAX_POLL_INTERVAL,
            timeout: ATTESTATION_TIMEOUT,
            call_timeout: ATTESTATION_CALL_TIMEOUT,
            standard_finality_chains: Vec::new(),
        }
    }
}

impl AttestationParams {
    /// The expected attestation latency of messages sent from `source_chain`.
    pub fn latency_class(&self, source_chain: ChainId) -> LatencyClass {
        if self.standard_finality_chains.contains(&source_chain) {
            LatencyClass::Standard
        } else {
            LatencyClass::Fast
        }
    }

    /// The upper bound on the poll interval for messages sent from `source_chain`.
    pub fn max_poll_interval(&self, source_chain: ChainId) -> Duration {
        match self.latency_class(source_chain) {
            LatencyClass::Fast => self.fast_max_poll_interval,
            LatencyClass::Standard => self.standard_max_poll_interval,
        }
    }
}

/// Parameters for submitting attested messages to the destination chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionParams {
    /// Number of submissions attempted before the transfer is failed.
    pub max_attempts: u32,

    /// Delay before the first retry. Doubles on every failed attempt.
    pub initial_backoff: Duration,

    /// Maximum delay between retries.
    pub max_backoff: Duration,

    /// Timeout of a single submission.
    pub call_timeout: Duration,

    /// Age of an in-flight submission after which another worker may take it over.
    ///
    /// Must exceed [`Self::call_timeout`]; a submission that is still running is never taken
    /// over.
    pub claim_timeout: Duration,
}

impl Default for SubmissionParams {
    fn default() -> Self {
        Self {
            max_attempts: MAX_SUBMIT_ATTEMPTS,
            initial_backoff: INITIAL_SUBMIT_BACKOFF,
            max_backoff: MAX_SUBMIT_BACKOFF,
            call_timeout: SUBMIT_CALL_TIMEOUT,
            claim_timeout: SUBMIT_CLAIM_TIMEOUT,
        }
    }
}

/// Parameters for restarting workers that stopped before their transfer settled.
///
/// A worker stops early when the store or the state machine fails, or when it panics. The
/// transfer is then driven again after a delay that doubles on every consecutive failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerParams {
    /// Delay before the first restart.
    pub initial_restart_backoff: Duration,

    /// Maximum delay between restarts.
    pub max_restart_backoff: Duration,
}

impl Default for WorkerParams {
    fn default() -> Self {
        Self {
            initial_restart_backoff: INITIAL_RESTART_BACKOFF,
            max_restart_backoff: MAX_RESTART_BACKOFF,
        }
    }
}
