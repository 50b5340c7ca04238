//! The Transfer State Machine (TSM).
//!
//! Responsible for advancing a [`TransferRecord`] through its lifecycle by reacting to events and
//! producing the duties required to make further progress.

use stable_router_primitives::{
    message::message_id_of,
    transfer::{FailureReason, TransferRecord, TransferState},
    types::Timestamp,
    Bytes,
};

use crate::{
    config::TransferSMCfg,
    duties::TransferDuty,
    errors::{TSMError, TSMResult},
    events::TransferEvent,
    state_machine::{SMOutput, StateMachine},
};

/// The output of the Transfer State Machine after processing an event.
pub type TSMOutput = SMOutput<TransferDuty>;

/// The state machine that tracks a single relayed transfer.
///
/// The machine owns a copy of the record. Every accepted event bumps [`TransferRecord::version`]
/// by exactly one so that the caller can persist the result with a compare-and-swap against the
/// version it started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSM {
    record: TransferRecord,
}

impl StateMachine for TransferSM {
    type Config = TransferSMCfg;
    type Duty = TransferDuty;
    type Event = TransferEvent;
    type Error = TSMError;

    fn process_event(&mut self, cfg: &Self::Config, event: Self::Event) -> TSMResult<TSMOutput> {
        let mut next = self.record.clone();

        let output = match event {
            TransferEvent::AttestationPending { now } => {
                Self::process_attestation_pending(cfg, &mut next, now)?
            }
            TransferEvent::AttestationReceived {
                message,
                attestation,
                now,
            } => Self::process_attestation_received(&mut next, message, attestation, now)?,
            TransferEvent::SubmissionClaimed { now } => {
                Self::process_submission_claimed(cfg, &mut next, now)?
            }
            TransferEvent::SubmissionSucceeded { now } => {
                Self::process_submission_resolved(&mut next, "SubmissionSucceeded", now)?
            }
            TransferEvent::AlreadyProcessed { now } => {
                Self::process_submission_resolved(&mut next, "AlreadyProcessed", now)?
            }
            TransferEvent::SubmissionFailed { reason, now } => {
                Self::process_submission_failed(cfg, &mut next, reason, now)?
            }
            TransferEvent::Cancelled { now } => Self::process_cancel(&mut next, now)?,
            TransferEvent::Resubmitted { now } => Self::process_resubmit(&mut next, now)?,
        };

        next.version += 1;
        self.record = next;

        Ok(output)
    }
}

impl TransferSM {
    /// Creates a state machine over the given record.
    pub const fn new(record: TransferRecord) -> Self {
        Self { record }
    }

    /// The current record.
    pub const fn record(&self) -> &TransferRecord {
        &self.record
    }

    /// The current lifecycle state.
    pub const fn state(&self) -> &TransferState {
        &self.record.state
    }

    /// Consumes the machine and returns the record.
    pub fn into_record(self) -> TransferRecord {
        self.record
    }

    /// The duties that resume processing of a record loaded from storage, without a transition.
    ///
    /// Used when the relayer restarts or when an operator action hands a record back to the
    /// pipeline.
    pub fn resume_duties(&self) -> Vec<TransferDuty> {
        let record = &self.record;

        match record.state {
            TransferState::Pending => vec![TransferDuty::PollAttestation {
                message_id: record.message_id,
                attempt: record.attempt_count,
            }],
            // a completing record is claimed again once its claim expires
            TransferState::Attested | TransferState::Completing => {
                vec![TransferDuty::ClaimSubmission {
                    message_id: record.message_id,
                    attempt: record.attempt_count,
                }]
            }
            TransferState::Completed | TransferState::Failed | TransferState::Cancelled => {
                Vec::new()
            }
        }
    }

    fn process_attestation_pending(
        cfg: &TransferSMCfg,
        record: &mut TransferRecord,
        now: Timestamp,
    ) -> TSMResult<TSMOutput> {
        expect_state(record, TransferState::Pending, "AttestationPending")?;

        if now >= record.created_at.saturating_add(cfg.attestation_timeout) {
            record.state = TransferState::Failed;
            record.failure_reason = Some(FailureReason::AttestationTimeout);
            record.last_attempt_at = Some(now);

            return Ok(TSMOutput::new());
        }

        record.attempt_count += 1;
        record.last_attempt_at = Some(now);

        Ok(TSMOutput::with_duty(TransferDuty::PollAttestation {
            message_id: record.message_id,
            attempt: record.attempt_count,
        }))
    }

    fn process_attestation_received(
        record: &mut TransferRecord,
        message: Bytes,
        attestation: Bytes,
        now: Timestamp,
    ) -> TSMResult<TSMOutput> {
        expect_state(record, TransferState::Pending, "AttestationReceived")?;

        if message_id_of(&message) != record.message_id {
            return Err(TSMError::InvalidEvent {
                state: record.state,
                event: "AttestationReceived".to_string(),
                reason: Some("attested message does not hash to the message id".to_string()),
            });
        }

        if attestation.is_empty() {
            return Err(TSMError::InvalidEvent {
                state: record.state,
                event: "AttestationReceived".to_string(),
                reason: Some("attestation is empty".to_string()),
            });
        }

        record.state = TransferState::Attested;
        record.message = Some(message);
        record.attestation = Some(attestation);
        record.attempt_count = 0;
        record.last_attempt_at = Some(now);

        Ok(TSMOutput::with_duty(TransferDuty::ClaimSubmission {
            message_id: record.message_id,
            attempt: 0,
        }))
    }

    fn process_submission_claimed(
        cfg: &TransferSMCfg,
        record: &mut TransferRecord,
        now: Timestamp,
    ) -> TSMResult<TSMOutput> {
        match record.state {
            TransferState::Attested => {}
            TransferState::Completing => {
                // the previous claimant may still be waiting for its submission to return
                let claim_expiry = record
                    .last_attempt_at
                    .unwrap_or(record.created_at)
                    .saturating_add(cfg.claim_timeout);

                if now < claim_expiry {
                    return Err(TSMError::Rejected {
                        state: record.state,
                        reason: format!("submission claimed until {claim_expiry}"),
                    });
                }
            }
            state => {
                return Err(TSMError::InvalidEvent {
                    state,
                    event: "SubmissionClaimed".to_string(),
                    reason: None,
                })
            }
        }

        let (Some(message), Some(attestation)) =
            (record.message.clone(), record.attestation.clone())
        else {
            return Err(TSMError::InvalidEvent {
                state: record.state,
                event: "SubmissionClaimed".to_string(),
                reason: Some("record has no attested message".to_string()),
            });
        };

        record.state = TransferState::Completing;
        record.attempt_count += 1;
        record.last_attempt_at = Some(now);

        Ok(TSMOutput::with_duty(TransferDuty::SubmitCompletion {
            message_id: record.message_id,
            dest_chain: record.dest_chain,
            message,
            attestation,
        }))
    }

    fn process_submission_resolved(
        record: &mut TransferRecord,
        event: &str,
        now: Timestamp,
    ) -> TSMResult<TSMOutput> {
        expect_state(record, TransferState::Completing, event)?;

        record.state = TransferState::Completed;
        record.last_attempt_at = Some(now);

        Ok(TSMOutput::new())
    }

    fn process_submission_failed(
        cfg: &TransferSMCfg,
        record: &mut TransferRecord,
        reason: String,
        now: Timestamp,
    ) -> TSMResult<TSMOutput> {
        expect_state(record, TransferState::Completing, "SubmissionFailed")?;

        record.last_attempt_at = Some(now);

        if record.attempt_count >= cfg.max_submit_attempts {
            record.state = TransferState::Failed;
            record.failure_reason = Some(FailureReason::SubmissionExhausted {
                attempts: record.attempt_count,
                last_error: reason,
            });

            return Ok(TSMOutput::new());
        }

        // nothing is in flight anymore, so the record may be retried (or cancelled)
        record.state = TransferState::Attested;

        Ok(TSMOutput::with_duty(TransferDuty::ClaimSubmission {
            message_id: record.message_id,
            attempt: record.attempt_count,
        }))
    }

    fn process_cancel(record: &mut TransferRecord, now: Timestamp) -> TSMResult<TSMOutput> {
        match record.state {
            TransferState::Pending | TransferState::Attested => {
                record.state = TransferState::Cancelled;
                record.failure_reason = Some(FailureReason::CancelledByOperator);
                record.last_attempt_at = Some(now);

                Ok(TSMOutput::new())
            }
            TransferState::Completing => Err(TSMError::Rejected {
                state: record.state,
                reason: "a submission may be in flight on the destination chain".to_string(),
            }),
            state => Err(TSMError::Rejected {
                state,
                reason: "transfer already reached a terminal state".to_string(),
            }),
        }
    }

    fn process_resubmit(record: &mut TransferRecord, now: Timestamp) -> TSMResult<TSMOutput> {
        if !matches!(record.state, TransferState::Failed | TransferState::Cancelled) {
            return Err(TSMError::Rejected {
                state: record.state,
                reason: "only failed or cancelled transfers can be resubmitted".to_string(),
            });
        }

        record.failure_reason = None;
        record.attempt_count = 0;
        record.last_attempt_at = None;
        record.created_at = now;

        let duty = if record.message.is_some() && record.attestation.is_some() {
            record.state = TransferState::Attested;
            TransferDuty::ClaimSubmission {
                message_id: record.message_id,
                attempt: 0,
            }
        } else {
            record.state = TransferState::Pending;
            TransferDuty::PollAttestation {
                message_id: record.message_id,
                attempt: 0,
            }
        };

        Ok(TSMOutput::with_duty(duty))
    }
}

fn expect_state(record: &TransferRecord, expected: TransferState, event: &str) -> TSMResult<()> {
    if record.state == expected {
        return Ok(());
    }

    if record.state.is_terminal() {
        return Err(TSMError::Rejected {
            state: record.state,
            reason: format!("{event} received after the transfer reached a terminal state"),
        });
    }

    Err(TSMError::InvalidEvent {
        state: record.state,
        event: event.to_string(),
        reason: Some(format!("expected state {expected}")),
    })
}
