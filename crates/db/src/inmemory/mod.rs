//! In-memory transfer store, used by tests and by relayers that run without a database file.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use stable_router_primitives::{
    transfer::{TransferRecord, TransferState},
    types::MessageId,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    errors::{DbError, DbResult},
    transfers::{check_successor, TransferStats, TransferStore},
};

/// A [`TransferStore`] that keeps every record in memory.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct TransferStoreInMemory {
    transfers: Arc<RwLock<HashMap<MessageId, TransferRecord>>>,
}

impl TransferStoreInMemory {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn oldest_first(mut records: Vec<TransferRecord>) -> Vec<TransferRecord> {
    records.sort_by_key(|r| (r.created_at, r.message_id));
    records
}

#[async_trait]
impl TransferStore for TransferStoreInMemory {
    async fn insert_transfer(&self, record: &TransferRecord) -> DbResult<bool> {
        let mut transfers = self.transfers.write().await;

        if transfers.contains_key(&record.message_id) {
            return Ok(false);
        }

        transfers.insert(record.message_id, record.clone());
        debug!(message_id = %record.message_id, "inserted transfer");

        Ok(true)
    }

    async fn get_transfer(&self, message_id: MessageId) -> DbResult<Option<TransferRecord>> {
        Ok(self.transfers.read().await.get(&message_id).cloned())
    }

    async fn compare_and_swap(
        &self,
        expected_state: TransferState,
        expected_version: u64,
        next: &TransferRecord,
    ) -> DbResult<()> {
        check_successor(expected_version, next)?;

        let mut transfers = self.transfers.write().await;

        let Some(current) = transfers.get_mut(&next.message_id) else {
            return Err(DbError::UnknownTransfer(next.message_id));
        };

        if current.state != expected_state || current.version != expected_version {
            return Err(DbError::StaleTransition {
                message_id: next.message_id,
                expected_state,
                expected_version,
            });
        }

        *current = next.clone();
        debug!(
            message_id = %next.message_id,
            from = %expected_state,
            to = %next.state,
            version = %next.version,
            "committed transition"
        );

        Ok(())
    }

    async fn transfers_in_states(
        &self,
        states: &[TransferState],
    ) -> DbResult<Vec<TransferRecord>> {
        let transfers = self.transfers.read().await;

        Ok(oldest_first(
            transfers
                .values()
                .filter(|r| states.contains(&r.state))
                .cloned()
                .collect(),
        ))
    }

    async fn all_transfers(&self) -> DbResult<Vec<TransferRecord>> {
        Ok(oldest_first(
            self.transfers.read().await.values().cloned().collect(),
        ))
    }

    async fn transfer_stats(&self) -> DbResult<TransferStats> {
        let transfers = self.transfers.read().await;
        let mut stats = TransferStats::default();

        for record in transfers.values() {
            *stats.counts.entry(record.state).or_default() += 1;

            if record.state == TransferState::Completed {
                stats.completed_volume = stats.completed_volume.saturating_add(record.amount);
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfers::test_suite;

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        test_suite::insert_is_idempotent(TransferStoreInMemory::new()).await;
    }

    #[tokio::test]
    async fn test_records_survive_storage_unchanged() {
        test_suite::records_survive_storage_unchanged(TransferStoreInMemory::new()).await;
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        test_suite::compare_and_swap_guards_state_and_version(TransferStoreInMemory::new()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_writers() {
        for _ in 0..32 {
            test_suite::racing_writers_commit_once(TransferStoreInMemory::new()).await;
        }
    }

    #[tokio::test]
    async fn test_queries() {
        test_suite::queries_filter_and_aggregate(TransferStoreInMemory::new()).await;
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = TransferStoreInMemory::new();
        let clone = store.clone();
        let record = test_suite::record(1, TransferState::Pending, 1_000);

        store.insert_transfer(&record).await.unwrap();

        assert_eq!(
            clone.get_transfer(record.message_id).await.unwrap(),
            Some(record)
        );
    }
}
