//! Tests for the Transfer State Machine.


use stable_router_params::RelayerParams;
use stable_router_primitives::transfer::TransferState;

pub(super) use crate::testing::{
    test_transfer_invalid_transition, test_transfer_transition, TransferInvalidTransition,
    TransferTransition,
};
use crate::{
    config::TransferSMCfg,
    duties::TransferDuty,
    events::TransferEvent,
    machine::TransferSM,
    state_machine::StateMachine,
    testing::fixtures::*,
};

#[test]
fn accepted_events_bump_the_version_once() {
    let cfg = test_cfg();
    let mut sm = create_sm(TransferState::Pending);
    let initial_version = sm.record().version;

    sm.process_event(
        &cfg,
        TransferEvent::AttestationPending {
            now: CREATED_AT + 1,
        },
    )
    .expect("poll must be accepted");

    assert_eq!(sm.record().version, initial_version + 1);
}

#[test]
fn rejected_events_leave_the_record_untouched() {
    let cfg = test_cfg();
    let mut sm = create_sm(TransferState::Completed);
    let before = sm.record().clone();

    let result = sm.process_event(
        &cfg,
        TransferEvent::SubmissionSucceeded {
            now: CREATED_AT + 1,
        },
    );

    assert!(result.is_err());
    assert_eq!(sm.record(), &before);
}

#[test]
fn resume_duties_match_the_stored_state() {
    let message_id = test_message_id();

    assert_eq!(
        create_sm(TransferState::Pending).resume_duties(),
        vec![TransferDuty::PollAttestation {
            message_id,
            attempt: 0
        }]
    );
    assert_eq!(
        create_sm(TransferState::Attested).resume_duties(),
        vec![TransferDuty::ClaimSubmission {
            message_id,
            attempt: 0
        }]
    );
    assert_eq!(
        create_sm(TransferState::Completing).resume_duties(),
        vec![TransferDuty::ClaimSubmission {
            message_id,
            attempt: 1
        }]
    );

    for state in [
        TransferState::Completed,
        TransferState::Failed,
        TransferState::Cancelled,
    ] {
        assert!(
            TransferSM::new(record_in(state)).resume_duties().is_empty(),
            "{state} must not resume"
        );
    }
}

#[test]
fn config_is_derived_from_params_in_millis() {
    let params = RelayerParams::default();
    let cfg = TransferSMCfg::from(&params);

    assert_eq!(
        cfg.attestation_timeout,
        params.attestation.timeout.as_millis() as u64
    );
    assert_eq!(
        cfg.claim_timeout,
        params.submission.claim_timeout.as_millis() as u64
    );
    assert_eq!(cfg.max_submit_attempts, params.submission.max_attempts);
}

#[test]
fn oversized_timeouts_saturate() {
    let mut params = RelayerParams::default();
    params.attestation.timeout = std::time::Duration::MAX;

    let cfg = TransferSMCfg::from(&params);

    assert_eq!(cfg.attestation_timeout, u64::MAX);
}
