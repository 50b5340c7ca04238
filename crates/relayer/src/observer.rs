//! Admission of observed dispatch events.

use stable_router_primitives::{
    domains::burn_mint_domain,
    events::ObservedTransfer,
    message::{message_id_of, BurnMessage},
    protocol::Protocol,
    transfer::TransferRecord,
    types::MessageId,
};
use tracing::{debug, info};

use crate::{
    errors::{RelayerError, RelayerResult},
    relayer::Relayer,
};

/// What the relayer did with an observed dispatch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveOutcome {
    /// A new pending record was created.
    Tracked(MessageId),

    /// The transfer was already tracked; the stored record is unchanged.
    Duplicate(MessageId),

    /// The protocol completes its transfers without an attestation relay.
    Ignored(Protocol),
}

impl Relayer {
    /// Starts tracking the transfer behind an observed dispatch event.
    ///
    /// Observing the same event any number of times tracks it once.
    pub async fn observe(&self, observed: &ObservedTransfer) -> RelayerResult<ObserveOutcome> {
        let event = &observed.event;

        if !event.protocol.requires_attestation() {
            debug!(message_id = %event.message_id, protocol = %event.protocol, "ignoring transfer");
            return Ok(ObserveOutcome::Ignored(event.protocol));
        }

        if let Some(message) = &observed.message {
            check_message(observed, message)?;
        }

        let record = TransferRecord::pending(observed, self.clock.now());

        if !self.store.insert_transfer(&record).await? {
            debug!(message_id = %record.message_id, "transfer already tracked");
            return Ok(ObserveOutcome::Duplicate(record.message_id));
        }

        info!(
            message_id = %record.message_id,
            source_chain = %record.source_chain,
            dest_chain = %record.dest_chain,
            amount = %record.amount,
            "tracking transfer"
        );

        Ok(ObserveOutcome::Tracked(record.message_id))
    }
}

/// Checks that the message emitted alongside a dispatch event is the message of that dispatch.
fn check_message(observed: &ObservedTransfer, message: &[u8]) -> RelayerResult<()> {
    let event = &observed.event;
    let invalid = |reason: String| Err(RelayerError::InvalidObservation(reason));

    if message_id_of(message) != event.message_id {
        return invalid(format!(
            "message hashes to {} instead of {}",
            message_id_of(message),
            event.message_id
        ));
    }

    let decoded = BurnMessage::decode(message)
        .map_err(|e| RelayerError::InvalidObservation(e.to_string()))?;

    if decoded.body.amount != event.amount {
        return invalid(format!(
            "message burns {} but the event reports {}",
            decoded.body.amount, event.amount
        ));
    }

    if decoded.mint_recipient_address() != event.recipient {
        return invalid(format!(
            "message mints to {} but the event reports {}",
            decoded.mint_recipient_address(),
            event.recipient
        ));
    }

    if let Some(domain) = burn_mint_domain(event.dest_chain) {
        if decoded.dest_domain != domain {
            return invalid(format!(
                "message targets domain {} but chain {} is domain {domain}",
                decoded.dest_domain, event.dest_chain
            ));
        }
    }

    Ok(())
}
