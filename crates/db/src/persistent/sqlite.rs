//! SQLite implementation of the transfer store.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use stable_router_primitives::{
    transfer::{TransferRecord, TransferState},
    types::MessageId,
    U256,
};
use tracing::{debug, info};

use super::{
    config::DbConfig,
    errors::StorageError,
    models::{widen, TransferRow},
    retry::execute_with_retries,
};
use crate::{
    errors::{DbError, DbResult},
    transfers::{check_successor, TransferStats, TransferStore},
    MIGRATOR,
};

const SELECT_TRANSFERS: &str = "SELECT message_id, protocol, source_chain, dest_chain, \
     source_token, dest_token, amount, recipient, state, message, attestation, failure_reason, \
     created_at, last_attempt_at, attempt_count, version FROM transfers";

/// A [`TransferStore`] backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
    config: DbConfig,
}

impl SqliteDb {
    /// Creates a store over an already migrated pool.
    pub fn new(pool: SqlitePool, config: DbConfig) -> Self {
        Self { pool, config }
    }

    /// Opens (creating if needed) the database at `url`, runs the migrations and returns the
    /// store.
    pub async fn connect(url: &str, config: DbConfig) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StorageError::from)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.busy_timeout());

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections())
            .connect_with(options)
            .await
            .map_err(StorageError::from)?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StorageError::Driver(e.into()))?;

        info!(%url, "opened transfer store");

        Ok(Self::new(pool, config))
    }

    /// The underlying pool.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_transfers(
        &self,
        filter: &str,
        binds: &[&'static str],
    ) -> DbResult<Vec<TransferRecord>> {
        let sql = format!("{SELECT_TRANSFERS} {filter} ORDER BY created_at, message_id");
        let sql = sql.as_str();

        let rows = execute_with_retries(&self.config, move || async move {
            let mut query = sqlx::query_as::<_, TransferRow>(sql);
            for bind in binds {
                query = query.bind(*bind);
            }

            query
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DbError::from(StorageError::from(e)))
        })
        .await?;

        rows.into_iter()
            .map(|row| TransferRecord::try_from(row).map_err(DbError::from))
            .collect()
    }

    async fn transfer_exists(&self, message_id: MessageId) -> DbResult<bool> {
        let message_id = message_id.to_string();
        let message_id = message_id.as_str();

        execute_with_retries(&self.config, move || async move {
            let (count,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM transfers WHERE message_id = ?")
                    .bind(message_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(StorageError::from)?;

            Ok::<_, DbError>(count > 0)
        })
        .await
    }
}

#[async_trait]
impl TransferStore for SqliteDb {
    async fn insert_transfer(&self, record: &TransferRecord) -> DbResult<bool> {
        let row = &TransferRow::try_from(record)?;

        let inserted = execute_with_retries(&self.config, move || async move {
            let result = sqlx::query(
                "INSERT INTO transfers
                    (message_id, protocol, source_chain, dest_chain, source_token, dest_token,
                     amount, recipient, state, message, attestation, failure_reason, created_at,
                     last_attempt_at, attempt_count, version)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    ON CONFLICT (message_id) DO NOTHING",
            )
            .bind(&row.message_id)
            .bind(row.protocol)
            .bind(row.source_chain)
            .bind(row.dest_chain)
            .bind(&row.source_token)
            .bind(&row.dest_token)
            .bind(&row.amount)
            .bind(&row.recipient)
            .bind(&row.state)
            .bind(&row.message)
            .bind(&row.attestation)
            .bind(&row.failure_reason)
            .bind(row.created_at)
            .bind(row.last_attempt_at)
            .bind(row.attempt_count)
            .bind(row.version)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

            Ok::<_, DbError>(result.rows_affected() == 1)
        })
        .await?;

        debug!(message_id = %record.message_id, %inserted, "inserted transfer");

        Ok(inserted)
    }

    async fn get_transfer(&self, message_id: MessageId) -> DbResult<Option<TransferRecord>> {
        let message_id = message_id.to_string();
        let message_id = message_id.as_str();
        let sql = format!("{SELECT_TRANSFERS} WHERE message_id = ?");
        let sql = sql.as_str();

        let row = execute_with_retries(&self.config, move || async move {
            sqlx::query_as::<_, TransferRow>(sql)
                .bind(message_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DbError::from(StorageError::from(e)))
        })
        .await?;

        Ok(row.map(TransferRecord::try_from).transpose()?)
    }

    async fn compare_and_swap(
        &self,
        expected_state: TransferState,
        expected_version: u64,
        next: &TransferRecord,
    ) -> DbResult<()> {
        check_successor(expected_version, next)?;

        let row = &TransferRow::try_from(next)?;
        let expected_version_col = widen("version", expected_version)?;

        let updated = execute_with_retries(&self.config, move || async move {
            let result = sqlx::query(
                "UPDATE transfers SET
                    state = ?, message = ?, attestation = ?, failure_reason = ?, created_at = ?,
                    last_attempt_at = ?, attempt_count = ?, version = ?
                    WHERE message_id = ? AND state = ? AND version = ?",
            )
            .bind(&row.state)
            .bind(&row.message)
            .bind(&row.attestation)
            .bind(&row.failure_reason)
            .bind(row.created_at)
            .bind(row.last_attempt_at)
            .bind(row.attempt_count)
            .bind(row.version)
            .bind(&row.message_id)
            .bind(expected_state.as_str())
            .bind(expected_version_col)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

            Ok::<_, DbError>(result.rows_affected())
        })
        .await?;

        if updated == 1 {
            debug!(
                message_id = %next.message_id,
                from = %expected_state,
                to = %next.state,
                version = %next.version,
                "committed transition"
            );
            return Ok(());
        }

        if !self.transfer_exists(next.message_id).await? {
            return Err(DbError::UnknownTransfer(next.message_id));
        }

        Err(DbError::StaleTransition {
            message_id: next.message_id,
            expected_state,
            expected_version,
        })
    }

    async fn transfers_in_states(
        &self,
        states: &[TransferState],
    ) -> DbResult<Vec<TransferRecord>> {
        if states.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; states.len()].join(", ");
        let names = states.iter().map(TransferState::as_str).collect::<Vec<_>>();

        self.fetch_transfers(&format!("WHERE state IN ({placeholders})"), &names)
            .await
    }

    async fn all_transfers(&self) -> DbResult<Vec<TransferRecord>> {
        self.fetch_transfers("", &[]).await
    }

    async fn transfer_stats(&self) -> DbResult<TransferStats> {
        let (counts, completed_amounts) = execute_with_retries(&self.config, move || async move {
            let counts: Vec<(String, i64)> =
                sqlx::query_as("SELECT state, COUNT(*) FROM transfers GROUP BY state")
                    .fetch_all(&self.pool)
                    .await
                    .map_err(StorageError::from)?;

            // amounts are stored as decimal text so they are summed here rather than in SQL
            let completed_amounts: Vec<(String,)> =
                sqlx::query_as("SELECT amount FROM transfers WHERE state = ?")
                    .bind(TransferState::Completed.as_str())
                    .fetch_all(&self.pool)
                    .await
                    .map_err(StorageError::from)?;

            Ok::<_, DbError>((counts, completed_amounts))
        })
        .await?;

        let mut stats = TransferStats::default();

        for (state, count) in counts {
            let state = state
                .parse::<TransferState>()
                .map_err(|e| StorageError::InvalidData(e.to_string()))?;
            let count = u64::try_from(count)
                .map_err(|_| StorageError::MismatchedTypes(format!("count = {count}")))?;

            stats.counts.insert(state, count);
        }

        for (amount,) in completed_amounts {
            let amount = amount
                .parse::<U256>()
                .map_err(|e| StorageError::InvalidData(format!("amount = {amount}: {e}")))?;

            stats.completed_volume = stats.completed_volume.saturating_add(amount);
        }

        Ok(stats)
    }
}
