//! Default values for the relayer parameters.

use std::time::Duration;

/// Default interval before the first attestation re-poll.
pub(crate) const INITIAL_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default upper bound on the poll interval for fast-finality sources.
pub(crate) const FAST_MAX_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default upper bound on the poll interval for standard-finality sources.
pub(crate) const STANDARD_MAX_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default hard ceiling on how long a transfer may wait for its attestation.
pub(crate) const ATTESTATION_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Default timeout of a single attestation service call.
pub(crate) const ATTESTATION_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of submissions attempted before a transfer is failed.
pub(crate) const MAX_SUBMIT_ATTEMPTS: u32 = 5;

/// Default delay before the first submission retry.
pub(crate) const INITIAL_SUBMIT_BACKOFF: Duration = Duration::from_secs(2);

/// Default upper bound on the submission retry delay.
pub(crate) const MAX_SUBMIT_BACKOFF: Duration = Duration::from_secs(60);

/// Default timeout of a single destination submission.
pub(crate) const SUBMIT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default age after which an in-flight submission is considered abandoned.
pub(crate) const SUBMIT_CLAIM_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default delay before a worker that stopped with an error is started again.
pub(crate) const INITIAL_RESTART_BACKOFF: Duration = Duration::from_secs(1);

/// Default upper bound on the worker restart delay.
pub(crate) const MAX_RESTART_BACKOFF: Duration = Duration::from_secs(60);
