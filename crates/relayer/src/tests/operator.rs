use std::time::Duration;

use relay_sm::errors::TSMError;
use stable_router_db::TransferStore;
use stable_router_params::RelayerParams;
use stable_router_primitives::{
    transfer::{FailureReason, TransferRecord, TransferState},
    types::MessageId,
    Bytes, B256,
};

use crate::{
    errors::RelayerError,
    test_utils::{
        attestation, burn_message, observed, AttestationBehavior, Harness,
        MockAttestationService, MockDestination, DEST_CHAIN, START,
    },
    worker::DriveOutcome,
};

#[tokio::test(start_paused = true)]
async fn cancelled_transfer_is_abandoned_by_its_worker() {
    let h = Harness::new(
        MockAttestationService::new(AttestationBehavior::NeverResponds),
        MockDestination::default(),
        RelayerParams::default(),
    );
    let message_id = observed(1).event.message_id;
    h.relayer.observe(&observed(1)).await.unwrap();

    let relayer = h.relayer.clone();
    let worker = tokio::spawn(async move { relayer.drive(message_id).await });
    tokio::time::sleep(Duration::from_secs(1)).await;

    let cancelled = h.relayer.cancel(message_id).await.unwrap();
    assert_eq!(cancelled.state, TransferState::Cancelled);
    assert_eq!(
        cancelled.failure_reason,
        Some(FailureReason::CancelledByOperator)
    );

    assert_eq!(worker.await.unwrap().unwrap(), DriveOutcome::Abandoned);

    let stored = h.store.get_transfer(message_id).await.unwrap().unwrap();
    assert_eq!(stored, cancelled, "the worker must not overwrite the cancellation");
}

#[tokio::test(start_paused = true)]
async fn transfer_with_submission_in_flight_cannot_be_cancelled() {
    let h = Harness::new(
        MockAttestationService::new(AttestationBehavior::CompleteAfter(0)),
        MockDestination::default(),
        RelayerParams::default(),
    );

    let mut record = TransferRecord::pending(&observed(1), START);
    record.state = TransferState::Completing;
    record.attestation = Some(attestation());
    record.attempt_count = 1;
    record.last_attempt_at = Some(START);
    h.store.insert_transfer(&record).await.unwrap();

    let result = h.relayer.cancel(record.message_id).await;

    assert!(
        matches!(
            result,
            Err(RelayerError::Transition(TSMError::Rejected {
                state: TransferState::Completing,
                ..
            }))
        ),
        "got {result:?}"
    );
    assert_eq!(
        h.store.get_transfer(record.message_id).await.unwrap(),
        Some(record)
    );
}

#[tokio::test(start_paused = true)]
async fn resubmitted_transfer_is_completed() {
    let params = RelayerParams::default();
    let max_attempts = params.submission.max_attempts as usize;
    let h = Harness::new(
        MockAttestationService::new(AttestationBehavior::CompleteAfter(0)),
        MockDestination::reverting(max_attempts),
        params,
    );
    let message_id = observed(1).event.message_id;
    h.relayer.observe(&observed(1)).await.unwrap();

    assert_eq!(
        h.relayer.drive(message_id).await.unwrap(),
        DriveOutcome::Settled(TransferState::Failed)
    );

    let resubmitted = h.relayer.resubmit(message_id).await.unwrap();
    assert_eq!(
        resubmitted.state,
        TransferState::Attested,
        "an attested transfer skips polling"
    );
    assert_eq!(resubmitted.failure_reason, None);
    assert_eq!(resubmitted.attempt_count, 0);

    assert_eq!(
        h.relayer.drive(message_id).await.unwrap(),
        DriveOutcome::Settled(TransferState::Completed)
    );
    assert_eq!(h.destination.calls(), max_attempts + 1);
    assert_eq!(h.attestations.polls(message_id), 1);
}

#[tokio::test(start_paused = true)]
async fn active_transfer_cannot_be_resubmitted() {
    let h = Harness::new(
        MockAttestationService::new(AttestationBehavior::CompleteAfter(0)),
        MockDestination::default(),
        RelayerParams::default(),
    );
    let message_id = observed(1).event.message_id;
    h.relayer.observe(&observed(1)).await.unwrap();

    assert!(matches!(
        h.relayer.resubmit(message_id).await,
        Err(RelayerError::Transition(TSMError::Rejected {
            state: TransferState::Pending,
            ..
        }))
    ));
}

#[tokio::test(start_paused = true)]
async fn actions_on_unknown_transfers_fail() {
    let h = Harness::new(
        MockAttestationService::new(AttestationBehavior::CompleteAfter(0)),
        MockDestination::default(),
        RelayerParams::default(),
    );
    let unknown = MessageId::new(B256::repeat_byte(0x99));

    assert!(matches!(
        h.relayer.cancel(unknown).await,
        Err(RelayerError::UnknownTransfer(id)) if id == unknown
    ));
    assert!(matches!(
        h.relayer.resubmit(unknown).await,
        Err(RelayerError::UnknownTransfer(id)) if id == unknown
    ));
    assert!(matches!(
        h.relayer.drive(unknown).await,
        Err(RelayerError::UnknownTransfer(id)) if id == unknown
    ));
    assert!(matches!(
        h.relayer.supply_attestation(unknown, Bytes::new(), attestation()).await,
        Err(RelayerError::UnknownTransfer(id)) if id == unknown
    ));
}

#[tokio::test(start_paused = true)]
async fn supplied_attestation_takes_over_from_the_poller() {
    let h = Harness::new(
        MockAttestationService::new(AttestationBehavior::NeverResponds),
        MockDestination::default(),
        RelayerParams::default(),
    );
    let observed = observed(1);
    let message_id = observed.event.message_id;
    let message = observed.message.clone().unwrap();
    h.relayer.observe(&observed).await.unwrap();

    let relayer = h.relayer.clone();
    let poller = tokio::spawn(async move { relayer.drive(message_id).await });
    tokio::time::sleep(Duration::from_secs(1)).await;

    let attested = h
        .relayer
        .supply_attestation(message_id, message.clone(), attestation())
        .await
        .unwrap();
    assert_eq!(attested.state, TransferState::Attested);
    assert_eq!(attested.attestation, Some(attestation()));

    assert_eq!(poller.await.unwrap().unwrap(), DriveOutcome::Abandoned);

    assert_eq!(
        h.relayer.drive(message_id).await.unwrap(),
        DriveOutcome::Settled(TransferState::Completed)
    );
    assert_eq!(
        h.destination.received(),
        vec![(DEST_CHAIN, message, attestation())]
    );
}

#[tokio::test(start_paused = true)]
async fn supplied_attestation_must_match_a_waiting_transfer() {
    let h = Harness::new(
        MockAttestationService::new(AttestationBehavior::NeverResponds),
        MockDestination::default(),
        RelayerParams::default(),
    );
    let observed = observed(1);
    let message_id = observed.event.message_id;
    h.relayer.observe(&observed).await.unwrap();
    let pending = h.store.get_transfer(message_id).await.unwrap().unwrap();

    let other_message = burn_message(2, observed.event.amount).encode();
    let result = h
        .relayer
        .supply_attestation(message_id, other_message, attestation())
        .await;
    assert!(
        matches!(
            result,
            Err(RelayerError::Transition(TSMError::InvalidEvent { .. }))
        ),
        "got {result:?}"
    );

    let message = observed.message.clone().unwrap();
    let result = h
        .relayer
        .supply_attestation(message_id, message.clone(), Bytes::new())
        .await;
    assert!(
        matches!(
            result,
            Err(RelayerError::Transition(TSMError::InvalidEvent { .. }))
        ),
        "got {result:?}"
    );

    assert_eq!(
        h.store.get_transfer(message_id).await.unwrap(),
        Some(pending),
        "rejected attestations leave the record untouched"
    );

    h.relayer
        .supply_attestation(message_id, message.clone(), attestation())
        .await
        .unwrap();
    let result = h
        .relayer
        .supply_attestation(message_id, message, attestation())
        .await;
    assert!(
        matches!(
            result,
            Err(RelayerError::Transition(TSMError::InvalidEvent {
                state: TransferState::Attested,
                ..
            }))
        ),
        "got {result:?}"
    );
}
