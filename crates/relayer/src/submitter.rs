//! Submission of attested messages to the destination chain.

use std::time::Duration;

use relay_sm::events::TransferEvent;
use stable_router_primitives::{
    transfer::{TransferRecord, TransferState},
    types::ChainId,
    Bytes,
};
use tracing::{info, warn};

use crate::{
    backoff::submit_delay,
    destination::ReceiveOutcome,
    errors::RelayerResult,
    relayer::{Applied, Relayer},
};

impl Relayer {
    /// Waits out the backoff of submission number `attempt + 1` and claims the record for
    /// submission.
    ///
    /// A record that is already [`TransferState::Completing`] belongs to whoever claimed it last
    /// until the claim expires, so the claim is not attempted before then.
    pub(crate) async fn claim_submission(
        &self,
        record: &TransferRecord,
        attempt: u32,
    ) -> RelayerResult<Option<Applied>> {
        let mut delay = submit_delay(&self.params.submission, attempt);

        if record.state == TransferState::Completing {
            let claim_expiry = record
                .last_attempt_at
                .unwrap_or(record.created_at)
                .saturating_add(self.cfg.claim_timeout);

            delay = delay.max(Duration::from_millis(
                claim_expiry.saturating_sub(self.clock.now()),
            ));
        }

        tokio::time::sleep(delay).await;

        self.apply(record, TransferEvent::SubmissionClaimed { now: self.clock.now() })
            .await
    }

    /// Calls `receiveMessage` on the destination chain and records the outcome.
    ///
    /// `record` must be the record as claimed.
    pub(crate) async fn submit_completion(
        &self,
        record: &TransferRecord,
        dest_chain: ChainId,
        message: &Bytes,
        attestation: &Bytes,
    ) -> RelayerResult<Option<Applied>> {
        let message_id = record.message_id;
        let attempt = record.attempt_count;
        let call_timeout = self.params.submission.call_timeout;

        let outcome = tokio::time::timeout(
            call_timeout,
            self.destination
                .receive_message(dest_chain, message, attestation),
        )
        .await;

        let now = self.clock.now();
        let event = match outcome {
            Ok(Ok(ReceiveOutcome::Received)) => TransferEvent::SubmissionSucceeded { now },
            Ok(Ok(ReceiveOutcome::AlreadyProcessed)) => {
                info!(%message_id, %dest_chain, "message was already received");
                TransferEvent::AlreadyProcessed { now }
            }
            Ok(Ok(ReceiveOutcome::Reverted(reason))) => {
                warn!(%message_id, %attempt, %reason, "submission reverted");
                TransferEvent::SubmissionFailed { reason, now }
            }
            Ok(Err(err)) => {
                warn!(%message_id, %attempt, %err, "submission failed");
                TransferEvent::SubmissionFailed {
                    reason: err.to_string(),
                    now,
                }
            }
            Err(_) => {
                warn!(%message_id, %attempt, ?call_timeout, "submission timed out");
                TransferEvent::SubmissionFailed {
                    reason: format!("no receipt after {call_timeout:?}"),
                    now,
                }
            }
        };

        self.apply(record, event).await
    }
}
