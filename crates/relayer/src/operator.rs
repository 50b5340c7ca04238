//! Operator actions on tracked transfers.

use relay_sm::events::TransferEvent;
use stable_router_primitives::{transfer::TransferRecord, types::MessageId, Bytes};
use tracing::info;

use crate::{
    errors::{RelayerError, RelayerResult},
    relayer::Relayer,
};

impl Relayer {
    /// Stops automatic processing of a pending or attested transfer.
    ///
    /// A transfer whose submission may be in flight cannot be cancelled.
    pub async fn cancel(&self, message_id: MessageId) -> RelayerResult<TransferRecord> {
        let now = self.clock.now();
        let record = self
            .operator_action(message_id, TransferEvent::Cancelled { now })
            .await?;

        info!(%message_id, "transfer cancelled by operator");

        Ok(record)
    }

    /// Hands a failed or cancelled transfer back to the pipeline with a fresh attestation
    /// deadline and a fresh submission budget.
    ///
    /// The caller is responsible for scheduling the returned record.
    pub async fn resubmit(&self, message_id: MessageId) -> RelayerResult<TransferRecord> {
        let now = self.clock.now();
        let record = self
            .operator_action(message_id, TransferEvent::Resubmitted { now })
            .await?;

        info!(%message_id, state = %record.state, "transfer resubmitted by operator");

        Ok(record)
    }

    /// Records an attestation obtained outside the relayer for a transfer that is still waiting
    /// for one.
    ///
    /// `message` must hash to the message id and `attestation` must not be empty. A worker that
    /// is polling for the transfer loses its next write and stops; the caller is responsible for
    /// scheduling the returned record.
    pub async fn supply_attestation(
        &self,
        message_id: MessageId,
        message: Bytes,
        attestation: Bytes,
    ) -> RelayerResult<TransferRecord> {
        let now = self.clock.now();
        let record = self
            .operator_action(
                message_id,
                TransferEvent::AttestationReceived {
                    message,
                    attestation,
                    now,
                },
            )
            .await?;

        info!(%message_id, "attestation supplied by operator");

        Ok(record)
    }

    async fn operator_action(
        &self,
        message_id: MessageId,
        event: TransferEvent,
    ) -> RelayerResult<TransferRecord> {
        let record = self
            .store
            .get_transfer(message_id)
            .await?
            .ok_or(RelayerError::UnknownTransfer(message_id))?;

        match self.apply(&record, event).await? {
            Some((next, _)) => Ok(next),
            None => Err(RelayerError::ConcurrentUpdate(message_id)),
        }
    }
}
