//! Mock services and fixtures for the relayer tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use stable_router_db::{
    errors::{DbError, DbResult},
    TransferStats, TransferStore, TransferStoreInMemory,
};
use stable_router_params::RelayerParams;
use stable_router_primitives::{
    events::{ObservedTransfer, TransferInitiated},
    message::{message_id_of, BurnBody, BurnMessage},
    protocol::Protocol,
    transfer::{TransferRecord, TransferState},
    types::{ChainId, MessageId, Timestamp},
    Address, Bytes, B256, U256,
};

use crate::{
    attestation::{AttestationError, AttestationService, AttestationStatus},
    clock::TokioClock,
    destination::{DestinationError, DestinationReceiver, ReceiveOutcome},
    relayer::Relayer,
};

pub(crate) const SOURCE_CHAIN: ChainId = 8453;
pub(crate) const DEST_CHAIN: ChainId = 42161;
pub(crate) const START: Timestamp = 1_700_000_000_000;

pub(crate) fn attestation() -> Bytes {
    Bytes::from(vec![0xa7; 65])
}

/// How a [`MockAttestationService`] answers.
#[derive(Debug, Clone)]
pub(crate) enum AttestationBehavior {
    /// Pending for the given number of polls of a message, then complete.
    CompleteAfter(usize),

    /// Every call hangs.
    NeverResponds,

    /// Every call fails.
    Unavailable,

    /// The first poll of a message panics, the next one completes.
    PanicsOnce,
}

/// An attestation service that attests every message the same way.
#[derive(Debug)]
pub(crate) struct MockAttestationService {
    behavior: AttestationBehavior,
    return_message: bool,
    messages: Mutex<HashMap<MessageId, Bytes>>,
    polls: Mutex<HashMap<MessageId, usize>>,
}

impl MockAttestationService {
    pub(crate) fn new(behavior: AttestationBehavior) -> Self {
        Self {
            behavior,
            return_message: false,
            messages: Mutex::new(HashMap::new()),
            polls: Mutex::new(HashMap::new()),
        }
    }

    /// Makes the service return `message` alongside its attestation.
    pub(crate) fn knows(self, message: Bytes) -> Self {
        self.messages
            .lock()
            .unwrap()
            .insert(message_id_of(&message), message);

        Self {
            return_message: true,
            ..self
        }
    }

    pub(crate) fn polls(&self, message_id: MessageId) -> usize {
        self.polls
            .lock()
            .unwrap()
            .get(&message_id)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl AttestationService for MockAttestationService {
    async fn get_attestation(
        &self,
        message_id: MessageId,
    ) -> Result<AttestationStatus, AttestationError> {
        let polls = {
            let mut polls = self.polls.lock().unwrap();
            let count = polls.entry(message_id).or_default();
            *count += 1;
            *count
        };

        match self.behavior {
            AttestationBehavior::CompleteAfter(pending) if polls > pending => {
                let message = self.return_message.then(|| {
                    self.messages.lock().unwrap().get(&message_id).cloned()
                });

                Ok(AttestationStatus::Complete {
                    message: message.flatten(),
                    attestation: attestation(),
                })
            }
            AttestationBehavior::CompleteAfter(_) => Ok(AttestationStatus::Pending),
            AttestationBehavior::PanicsOnce if polls == 1 => {
                panic!("attestation service client crashed")
            }
            AttestationBehavior::PanicsOnce => Ok(AttestationStatus::Complete {
                message: None,
                attestation: attestation(),
            }),
            AttestationBehavior::NeverResponds => std::future::pending().await,
            AttestationBehavior::Unavailable => {
                Err(AttestationError::Transport("connection refused".to_string()))
            }
        }
    }
}

/// A destination chain that credits every message at most once.
#[derive(Debug, Default)]
pub(crate) struct MockDestination {
    calls: AtomicUsize,
    reverts: AtomicUsize,
    processed: Mutex<HashSet<MessageId>>,
    received: Mutex<Vec<(ChainId, Bytes, Bytes)>>,
}

impl MockDestination {
    /// A destination whose first `count` calls revert.
    pub(crate) fn reverting(count: usize) -> Self {
        Self {
            reverts: AtomicUsize::new(count),
            ..Default::default()
        }
    }

    /// Marks `message_id` as received before the relayer ever submitted it.
    pub(crate) fn already_received(&self, message_id: MessageId) {
        self.processed.lock().unwrap().insert(message_id);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every message that was credited, in order.
    pub(crate) fn received(&self) -> Vec<(ChainId, Bytes, Bytes)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl DestinationReceiver for MockDestination {
    async fn receive_message(
        &self,
        dest_chain: ChainId,
        message: &Bytes,
        attestation: &Bytes,
    ) -> Result<ReceiveOutcome, DestinationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reverting = self
            .reverts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if reverting {
            return Ok(ReceiveOutcome::Reverted("execution reverted".to_string()));
        }

        if !self.processed.lock().unwrap().insert(message_id_of(message)) {
            return Ok(ReceiveOutcome::AlreadyProcessed);
        }

        self.received
            .lock()
            .unwrap()
            .push((dest_chain, message.clone(), attestation.clone()));

        Ok(ReceiveOutcome::Received)
    }
}

/// A store whose first compare-and-swaps fail as if the disk were full.
#[derive(Debug)]
pub(crate) struct FlakyStore {
    inner: Arc<TransferStoreInMemory>,
    failing_swaps: AtomicUsize,
    failed_swaps: AtomicUsize,
}

impl FlakyStore {
    /// Fails the first `count` compare-and-swaps.
    pub(crate) fn new(inner: Arc<TransferStoreInMemory>, count: usize) -> Self {
        Self {
            inner,
            failing_swaps: AtomicUsize::new(count),
            failed_swaps: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failed_swaps(&self) -> usize {
        self.failed_swaps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransferStore for FlakyStore {
    async fn insert_transfer(&self, record: &TransferRecord) -> DbResult<bool> {
        self.inner.insert_transfer(record).await
    }

    async fn get_transfer(&self, message_id: MessageId) -> DbResult<Option<TransferRecord>> {
        self.inner.get_transfer(message_id).await
    }

    async fn compare_and_swap(
        &self,
        expected_state: TransferState,
        expected_version: u64,
        next: &TransferRecord,
    ) -> DbResult<()> {
        let failing = self
            .failing_swaps
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            self.failed_swaps.fetch_add(1, Ordering::SeqCst);
            return Err(DbError::InvalidUpdate("disk full".to_string()));
        }

        self.inner
            .compare_and_swap(expected_state, expected_version, next)
            .await
    }

    async fn transfers_in_states(
        &self,
        states: &[TransferState],
    ) -> DbResult<Vec<TransferRecord>> {
        self.inner.transfers_in_states(states).await
    }

    async fn all_transfers(&self) -> DbResult<Vec<TransferRecord>> {
        self.inner.all_transfers().await
    }

    async fn transfer_stats(&self) -> DbResult<TransferStats> {
        self.inner.transfer_stats().await
    }
}

/// The pieces of a relayer under test.
pub(crate) struct Harness {
    pub(crate) relayer: Arc<Relayer>,
    pub(crate) store: Arc<TransferStoreInMemory>,
    pub(crate) attestations: Arc<MockAttestationService>,
    pub(crate) destination: Arc<MockDestination>,
}

impl Harness {
    /// Must be called inside a tokio runtime.
    pub(crate) fn new(
        attestations: MockAttestationService,
        destination: MockDestination,
        params: RelayerParams,
    ) -> Self {
        let store = Arc::new(TransferStoreInMemory::new());

        Self::with_backend(store.clone(), store, attestations, destination, params)
    }

    /// A harness whose relayer writes through `backend`, which must be backed by `store`.
    pub(crate) fn with_backend(
        store: Arc<TransferStoreInMemory>,
        backend: Arc<dyn TransferStore>,
        attestations: MockAttestationService,
        destination: MockDestination,
        params: RelayerParams,
    ) -> Self {
        let attestations = Arc::new(attestations);
        let destination = Arc::new(destination);

        let relayer = Relayer::new(
            backend,
            attestations.clone(),
            destination.clone(),
            params,
        )
        .with_clock(Arc::new(TokioClock::starting_at(START)));

        Self {
            relayer: Arc::new(relayer),
            store,
            attestations,
            destination,
        }
    }
}

/// A burn/mint message for a transfer of `amount` from Base to Arbitrum.
pub(crate) fn burn_message(nonce: u64, amount: U256) -> BurnMessage {
    BurnMessage {
        version: 1,
        source_domain: 6,
        dest_domain: 3,
        nonce,
        sender: B256::repeat_byte(0x0e),
        recipient: B256::repeat_byte(0x0e),
        destination_caller: B256::ZERO,
        body: BurnBody {
            version: 1,
            burn_token: Address::repeat_byte(0xaa).into_word(),
            mint_recipient: Address::repeat_byte(0x0c).into_word(),
            amount,
            message_sender: Address::repeat_byte(0xee).into_word(),
            hook_data: Bytes::new(),
        },
    }
}

/// The dispatch event of [`burn_message`], as seen on Base.
pub(crate) fn observed(nonce: u64) -> ObservedTransfer {
    let amount = U256::from(1_000_000u64);
    let message = burn_message(nonce, amount).encode();

    ObservedTransfer {
        source_chain: SOURCE_CHAIN,
        event: TransferInitiated {
            message_id: message_id_of(&message),
            sender: Address::repeat_byte(0x02),
            source_token: Address::repeat_byte(0xaa),
            dest_token: Address::repeat_byte(0xaa),
            amount,
            dest_chain: DEST_CHAIN,
            recipient: Address::repeat_byte(0x0c),
            protocol: Protocol::BurnMint,
        },
        message: Some(message),
    }
}
