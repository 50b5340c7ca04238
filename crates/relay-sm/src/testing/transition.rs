//! Value-based helpers for testing transitions of the [`TransferSM`].
//!
//! Every helper starts from a fixture record (see [`record_in`]) and runs with [`test_cfg`].

use stable_router_primitives::transfer::TransferState;

use super::fixtures::{create_sm, record_in, test_cfg};
use crate::{
    config::TransferSMCfg, duties::TransferDuty, errors::TSMError, events::TransferEvent,
    machine::TransferSM, state_machine::StateMachine,
};

/// An event that must be accepted, and what it must lead to.
#[derive(Debug)]
pub(crate) struct TransferTransition {
    /// State of the fixture record the event is applied to.
    pub(crate) from_state: TransferState,
    pub(crate) event: TransferEvent,
    pub(crate) expected_state: TransferState,
    pub(crate) expected_duties: Vec<TransferDuty>,
}

/// Applies the event and checks the resulting state, the duties and the version bump.
pub(crate) fn test_transfer_transition(transition: TransferTransition) {
    let mut sm = create_sm(transition.from_state);
    let before = sm.record().clone();

    let output = sm
        .process_event(&test_cfg(), transition.event)
        .unwrap_or_else(|e| panic!("expected the event to be accepted, got: {e:?}"));

    assert_eq!(
        sm.state(),
        &transition.expected_state,
        "state mismatch after transition from {}",
        transition.from_state
    );
    assert_eq!(output.duties, transition.expected_duties, "duties mismatch");
    assert_eq!(
        sm.record().version,
        before.version + 1,
        "an accepted event must bump the version by one"
    );
    assert_eq!(
        sm.record().message_id,
        before.message_id,
        "the message id never changes"
    );
}

/// An event that must be refused.
#[derive(Debug)]
pub(crate) struct TransferInvalidTransition {
    /// State of the fixture record the event is applied to.
    pub(crate) from_state: TransferState,
    pub(crate) event: TransferEvent,
    /// Checks that the error is the expected one.
    pub(crate) expected_error: fn(&TSMError) -> bool,
}

/// Applies the event and checks that it is refused with the expected error and that the record
/// is left exactly as it was.
pub(crate) fn test_transfer_invalid_transition(invalid: TransferInvalidTransition) {
    let before = record_in(invalid.from_state);
    let mut sm = TransferSM::new(before.clone());

    let err = match sm.process_event(&test_cfg(), invalid.event) {
        Ok(output) => panic!("expected an error, got duties: {:?}", output.duties),
        Err(err) => err,
    };

    assert!((invalid.expected_error)(&err), "unexpected error: {err:?}");
    assert_eq!(sm.record(), &before, "record changed despite error");
}

/// Runs events one after the other through a single machine, collecting what they produce.
#[derive(Debug)]
pub(crate) struct EventSequence<'cfg> {
    sm: TransferSM,
    config: &'cfg TransferSMCfg,
    duties: Vec<TransferDuty>,
    errors: Vec<(usize, TSMError)>,
}

impl<'cfg> EventSequence<'cfg> {
    pub(crate) const fn new(sm: TransferSM, config: &'cfg TransferSMCfg) -> Self {
        Self {
            sm,
            config,
            duties: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Processes `events` in order. A refused event is recorded and the sequence goes on.
    pub(crate) fn process(&mut self, events: impl IntoIterator<Item = TransferEvent>) -> &mut Self {
        for (idx, event) in events.into_iter().enumerate() {
            match self.sm.process_event(self.config, event) {
                Ok(output) => self.duties.extend(output.duties),
                Err(err) => self.errors.push((idx, err)),
            }
        }

        self
    }

    pub(crate) const fn sm(&self) -> &TransferSM {
        &self.sm
    }

    /// Every duty emitted so far, in order.
    pub(crate) fn all_duties(&self) -> &[TransferDuty] {
        &self.duties
    }

    /// Every refused event, by its index in the sequence, with the error it caused.
    pub(crate) fn all_errors(&self) -> &[(usize, TSMError)] {
        &self.errors
    }
}
