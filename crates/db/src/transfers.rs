//! The transfer store interface.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stable_router_primitives::{
    transfer::{TransferRecord, TransferState},
    types::MessageId,
    U256,
};

use crate::errors::{DbError, DbResult};

/// Aggregate counts over every stored transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStats {
    /// Number of transfers per state. States without transfers are absent.
    pub counts: BTreeMap<TransferState, u64>,

    /// Sum of the amounts of completed transfers.
    pub completed_volume: U256,
}

impl TransferStats {
    /// Number of transfers in `state`.
    pub fn count(&self, state: TransferState) -> u64 {
        self.counts.get(&state).copied().unwrap_or_default()
    }

    /// Number of transfers across all states.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Durable storage of [`TransferRecord`]s keyed by [`MessageId`].
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Inserts a new record. Returns `false` without touching the stored record if one already
    /// exists for the message.
    async fn insert_transfer(&self, record: &TransferRecord) -> DbResult<bool>;

    /// Reads the record of a message.
    async fn get_transfer(&self, message_id: MessageId) -> DbResult<Option<TransferRecord>>;

    /// Replaces the stored record with `next` if and only if the stored record is still in
    /// `expected_state` at `expected_version`.
    ///
    /// `next` must be the direct successor of the expected record, i.e., have the same message
    /// id and a version one higher. Fails with [`DbError::StaleTransition`] when the stored
    /// record has moved on and with [`DbError::UnknownTransfer`] when there is none.
    async fn compare_and_swap(
        &self,
        expected_state: TransferState,
        expected_version: u64,
        next: &TransferRecord,
    ) -> DbResult<()>;

    /// Every record in one of `states`, oldest first.
    async fn transfers_in_states(&self, states: &[TransferState])
        -> DbResult<Vec<TransferRecord>>;

    /// Every record, oldest first.
    async fn all_transfers(&self) -> DbResult<Vec<TransferRecord>>;

    /// Counts per state and completed volume.
    async fn transfer_stats(&self) -> DbResult<TransferStats>;
}

/// Checks that `next` may replace a record at `expected_version`.
pub(crate) fn check_successor(expected_version: u64, next: &TransferRecord) -> DbResult<()> {
    if expected_version.checked_add(1) != Some(next.version) {
        return Err(DbError::InvalidUpdate(format!(
            "version {} does not follow {expected_version}",
            next.version
        )));
    }

    Ok(())
}
