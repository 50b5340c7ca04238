//! Records, events and strategies shared by the transfer state machine tests.

use proptest::prelude::*;
use stable_router_primitives::{
    message::message_id_of,
    protocol::Protocol,
    transfer::{FailureReason, TransferRecord, TransferState},
    types::{MessageId, Timestamp},
    Address, Bytes, U256,
};

use crate::{config::TransferSMCfg, events::TransferEvent, machine::TransferSM};

pub(crate) const TEST_ATTESTATION_TIMEOUT: Timestamp = 3_600_000;
pub(crate) const TEST_MAX_SUBMIT_ATTEMPTS: u32 = 3;
pub(crate) const TEST_CLAIM_TIMEOUT: Timestamp = 300_000;

/// Creation time of every fixture record.
pub(crate) const CREATED_AT: Timestamp = 1_700_000_000_000;

/// Time of the last attempt on fixture records that are in flight.
pub(crate) const LAST_ATTEMPT_AT: Timestamp = CREATED_AT + 10_000;

pub(crate) const fn test_cfg() -> TransferSMCfg {
    TransferSMCfg {
        attestation_timeout: TEST_ATTESTATION_TIMEOUT,
        max_submit_attempts: TEST_MAX_SUBMIT_ATTEMPTS,
        claim_timeout: TEST_CLAIM_TIMEOUT,
    }
}

pub(crate) fn test_message() -> Bytes {
    Bytes::from(b"burn of 1000000 usdc from base to arbitrum".to_vec())
}

pub(crate) fn test_attestation() -> Bytes {
    Bytes::from(vec![0xa7; 65])
}

pub(crate) fn test_message_id() -> MessageId {
    message_id_of(&test_message())
}

/// A record in `state` with the fields that state implies.
pub(crate) fn record_in(state: TransferState) -> TransferRecord {
    let mut record = TransferRecord {
        message_id: test_message_id(),
        protocol: Protocol::BurnMint,
        source_chain: 8453,
        dest_chain: 42161,
        source_token: Address::repeat_byte(0xaa),
        dest_token: Address::repeat_byte(0xbb),
        amount: U256::from(1_000_000u64),
        recipient: Address::repeat_byte(0x0c),
        state,
        message: None,
        attestation: None,
        failure_reason: None,
        created_at: CREATED_AT,
        last_attempt_at: None,
        attempt_count: 0,
        version: 7,
    };

    match state {
        TransferState::Pending => {}
        TransferState::Attested | TransferState::Completed => {
            record.message = Some(test_message());
            record.attestation = Some(test_attestation());
        }
        TransferState::Completing => {
            record.message = Some(test_message());
            record.attestation = Some(test_attestation());
            record.attempt_count = 1;
            record.last_attempt_at = Some(LAST_ATTEMPT_AT);
        }
        TransferState::Failed => {
            record.message = Some(test_message());
            record.attestation = Some(test_attestation());
            record.attempt_count = TEST_MAX_SUBMIT_ATTEMPTS;
            record.last_attempt_at = Some(LAST_ATTEMPT_AT);
            record.failure_reason = Some(FailureReason::SubmissionExhausted {
                attempts: TEST_MAX_SUBMIT_ATTEMPTS,
                last_error: "execution reverted".to_string(),
            });
        }
        TransferState::Cancelled => {
            record.failure_reason = Some(FailureReason::CancelledByOperator);
        }
    }

    record
}

pub(crate) fn create_sm(state: TransferState) -> TransferSM {
    TransferSM::new(record_in(state))
}

pub(crate) fn create_sm_from_record(record: TransferRecord) -> TransferSM {
    TransferSM::new(record)
}

pub(crate) const fn get_state(sm: &TransferSM) -> &TransferState {
    sm.state()
}

pub(crate) fn arb_state() -> impl Strategy<Value = TransferState> {
    prop::sample::select(TransferState::ALL.to_vec())
}

pub(crate) fn arb_terminal_state() -> impl Strategy<Value = TransferState> {
    prop::sample::select(vec![
        TransferState::Completed,
        TransferState::Failed,
        TransferState::Cancelled,
    ])
}

/// Records in any state, with a varying attempt count and last attempt time.
pub(crate) fn arb_record() -> impl Strategy<Value = TransferRecord> {
    (
        arb_state(),
        0..=TEST_MAX_SUBMIT_ATTEMPTS,
        proptest::option::of(CREATED_AT..CREATED_AT + TEST_ATTESTATION_TIMEOUT),
    )
        .prop_map(|(state, attempt_count, last_attempt_at)| {
            let mut record = record_in(state);
            record.attempt_count = attempt_count;
            if state != TransferState::Completing {
                record.last_attempt_at = last_attempt_at;
            }

            record
        })
}

pub(crate) fn arb_terminal_record() -> impl Strategy<Value = TransferRecord> {
    arb_terminal_state().prop_map(record_in)
}

fn arb_now() -> impl Strategy<Value = Timestamp> {
    CREATED_AT..CREATED_AT + 2 * TEST_ATTESTATION_TIMEOUT
}

fn arb_attested_message() -> impl Strategy<Value = Bytes> {
    prop_oneof![
        3 => Just(test_message()),
        1 => proptest::collection::vec(any::<u8>(), 1..64).prop_map(Bytes::from),
    ]
}

/// Events that the relayer pipeline produces on its own.
pub(crate) fn arb_pipeline_event() -> impl Strategy<Value = TransferEvent> {
    prop_oneof![
        arb_now().prop_map(|now| TransferEvent::AttestationPending { now }),
        (arb_attested_message(), arb_now()).prop_map(|(message, now)| {
            TransferEvent::AttestationReceived {
                message,
                attestation: test_attestation(),
                now,
            }
        }),
        arb_now().prop_map(|now| TransferEvent::SubmissionClaimed { now }),
        arb_now().prop_map(|now| TransferEvent::SubmissionSucceeded { now }),
        arb_now().prop_map(|now| TransferEvent::AlreadyProcessed { now }),
        ("[a-z ]{1,24}", arb_now())
            .prop_map(|(reason, now)| TransferEvent::SubmissionFailed { reason, now }),
        arb_now().prop_map(|now| TransferEvent::Cancelled { now }),
    ]
}

/// Every event, including the operator's resubmission.
pub(crate) fn arb_event() -> impl Strategy<Value = TransferEvent> {
    prop_oneof![
        7 => arb_pipeline_event(),
        1 => arb_now().prop_map(|now| TransferEvent::Resubmitted { now }),
    ]
}
