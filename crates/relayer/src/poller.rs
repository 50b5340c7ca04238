//! Polling of the attestation service.

use std::time::Duration;

use relay_sm::events::TransferEvent;
use stable_router_primitives::{message::message_id_of, transfer::TransferRecord};
use tracing::{debug, warn};

use crate::{
    attestation::AttestationStatus,
    backoff::poll_delay,
    errors::RelayerResult,
    relayer::{Applied, Relayer},
};

impl Relayer {
    /// Waits out the backoff of poll number `attempt + 1`, polls the attestation service and
    /// records the result.
    ///
    /// Neither the wait nor the call extends past the attestation deadline, so a record that
    /// never gets attested is failed at its deadline.
    pub(crate) async fn poll_attestation(
        &self,
        record: &TransferRecord,
        attempt: u32,
    ) -> RelayerResult<Option<Applied>> {
        let deadline = record
            .created_at
            .saturating_add(self.cfg.attestation_timeout);
        let until_deadline = || Duration::from_millis(deadline.saturating_sub(self.clock.now()));

        let delay = poll_delay(&self.params.attestation, record.source_chain, attempt);
        tokio::time::sleep(delay.min(until_deadline())).await;

        let remaining = until_deadline();
        if remaining.is_zero() {
            return self
                .apply(record, TransferEvent::AttestationPending { now: self.clock.now() })
                .await;
        }

        let call_timeout = self.params.attestation.call_timeout.min(remaining);
        let message_id = record.message_id;

        let status = tokio::time::timeout(
            call_timeout,
            self.attestations.get_attestation(message_id),
        )
        .await;

        let now = self.clock.now();
        let event = match status {
            Ok(Ok(AttestationStatus::Complete {
                message,
                attestation,
            })) => match message.or_else(|| record.message.clone()) {
                Some(message) if message_id_of(&message) != message_id => {
                    warn!(%message_id, "attestation service returned a different message");
                    TransferEvent::AttestationPending { now }
                }
                Some(_) if attestation.is_empty() => {
                    warn!(%message_id, "attestation service returned an empty attestation");
                    TransferEvent::AttestationPending { now }
                }
                Some(message) => TransferEvent::AttestationReceived {
                    message,
                    attestation,
                    now,
                },
                None => {
                    warn!(%message_id, "attested, but the message itself is unknown");
                    TransferEvent::AttestationPending { now }
                }
            },
            Ok(Ok(AttestationStatus::Pending)) => {
                debug!(%message_id, %attempt, "attestation pending");
                TransferEvent::AttestationPending { now }
            }
            Ok(Err(err)) => {
                warn!(%message_id, %attempt, %err, "attestation poll failed, will retry");
                TransferEvent::AttestationPending { now }
            }
            Err(_) => {
                warn!(%message_id, %attempt, ?call_timeout, "attestation poll timed out");
                TransferEvent::AttestationPending { now }
            }
        };

        self.apply(record, event).await
    }
}
