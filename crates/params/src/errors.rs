//! Errors for the relayer parameters.

use std::time::Duration;

use thiserror::Error;

/// A combination of parameter values the relayer cannot run with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// An in-flight submission could be claimed by a second worker before its call timed out.
    #[error("claim timeout {claim_timeout:?} must exceed submission call timeout {call_timeout:?}")]
    ClaimTimeoutTooShort {
        /// The configured claim timeout.
        claim_timeout: Duration,
        /// The configured submission call timeout.
        call_timeout: Duration,
    },

    /// Transfers would be failed without a single submission.
    #[error("at least one submission attempt is required")]
    NoSubmitAttempts,

    /// The attestation service would be polled without pause.
    #[error("initial poll interval must be non-zero")]
    ZeroPollInterval,
}
