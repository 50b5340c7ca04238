//! Drives a single transfer through its duties.

use relay_sm::{duties::TransferDuty, machine::TransferSM};
use stable_router_primitives::{
    transfer::{TransferRecord, TransferState},
    types::MessageId,
};
use tracing::{debug, info};

use crate::{
    errors::{RelayerError, RelayerResult},
    relayer::Relayer,
};

/// How a worker stopped driving a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// The transfer reached the given terminal state.
    Settled(TransferState),

    /// Another writer advanced the transfer first; it is theirs to drive now.
    Abandoned,
}

impl Relayer {
    /// Loads the record of `message_id` and drives it until it settles or another writer takes
    /// over.
    pub async fn drive(&self, message_id: MessageId) -> RelayerResult<DriveOutcome> {
        let record = self
            .store
            .get_transfer(message_id)
            .await?
            .ok_or(RelayerError::UnknownTransfer(message_id))?;

        self.resume(record).await
    }

    /// Drives `record` from wherever it currently is.
    pub async fn resume(&self, record: TransferRecord) -> RelayerResult<DriveOutcome> {
        let duties = TransferSM::new(record.clone()).resume_duties();

        self.run_duties(record, duties).await
    }

    async fn run_duties(
        &self,
        mut record: TransferRecord,
        mut duties: Vec<TransferDuty>,
    ) -> RelayerResult<DriveOutcome> {
        loop {
            // every transition out of a non-terminal state emits exactly one duty
            let Some(duty) = duties.pop() else {
                info!(message_id = %record.message_id, state = %record.state, "transfer settled");
                return Ok(DriveOutcome::Settled(record.state));
            };

            debug!(message_id = %record.message_id, ?duty, "executing duty");

            let applied = match duty {
                TransferDuty::PollAttestation { attempt, .. } => {
                    self.poll_attestation(&record, attempt).await?
                }
                TransferDuty::ClaimSubmission { attempt, .. } => {
                    self.claim_submission(&record, attempt).await?
                }
                TransferDuty::SubmitCompletion {
                    dest_chain,
                    message,
                    attestation,
                    ..
                } => {
                    self.submit_completion(&record, dest_chain, &message, &attestation)
                        .await?
                }
            };

            match applied {
                Some((next, next_duties)) => {
                    record = next;
                    duties = next_duties;
                }
                None => return Ok(DriveOutcome::Abandoned),
            }
        }
    }
}
