//! Static configuration of the transfer state machine.

use stable_router_params::RelayerParams;
use stable_router_primitives::types::{duration_millis, Timestamp};

/// The limits consulted while processing events.
///
/// All durations are in milliseconds so that they can be compared against record timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSMCfg {
    /// Time after record creation at which a transfer that is still waiting for its attestation
    /// is failed.
    pub attestation_timeout: Timestamp,

    /// Number of submission attempts after which a transfer is failed.
    pub max_submit_attempts: u32,

    /// Time after the last submission attempt at which an in-flight submission may be claimed
    /// again.
    pub claim_timeout: Timestamp,
}

impl From<&RelayerParams> for TransferSMCfg {
    fn from(params: &RelayerParams) -> Self {
        Self {
            attestation_timeout: duration_millis(params.attestation.timeout),
            max_submit_attempts: params.submission.max_attempts,
            claim_timeout: duration_millis(params.submission.claim_timeout),
        }
    }
}
