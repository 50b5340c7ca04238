//! Row models of the SQLite tables.

use std::str::FromStr;

use stable_router_primitives::{
    protocol::Protocol,
    transfer::{FailureReason, TransferRecord, TransferState},
    types::MessageId,
    Address, Bytes, U256,
};

use super::errors::StorageError;

/// A row of the `transfers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct TransferRow {
    /// 0x-prefixed hex.
    pub(super) message_id: String,
    pub(super) protocol: i64,
    pub(super) source_chain: i64,
    pub(super) dest_chain: i64,
    pub(super) source_token: String,
    pub(super) dest_token: String,
    /// Decimal string.
    pub(super) amount: String,
    pub(super) recipient: String,
    pub(super) state: String,
    pub(super) message: Option<Vec<u8>>,
    pub(super) attestation: Option<Vec<u8>>,
    /// JSON encoded [`FailureReason`].
    pub(super) failure_reason: Option<String>,
    pub(super) created_at: i64,
    pub(super) last_attempt_at: Option<i64>,
    pub(super) attempt_count: i64,
    pub(super) version: i64,
}

fn parse<T: FromStr>(column: &str, value: &str) -> Result<T, StorageError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| StorageError::InvalidData(format!("{column} = {value}: {e}")))
}

fn narrow<T: TryFrom<i64>>(column: &str, value: i64) -> Result<T, StorageError> {
    T::try_from(value)
        .map_err(|_| StorageError::MismatchedTypes(format!("{column} = {value} is out of range")))
}

pub(super) fn widen(column: &str, value: u64) -> Result<i64, StorageError> {
    i64::try_from(value)
        .map_err(|_| StorageError::MismatchedTypes(format!("{column} = {value} is out of range")))
}

impl TryFrom<TransferRow> for TransferRecord {
    type Error = StorageError;

    fn try_from(row: TransferRow) -> Result<Self, Self::Error> {
        let protocol_id: u8 = narrow("protocol", row.protocol)?;
        let protocol = Protocol::try_from(protocol_id)
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;

        let failure_reason = row
            .failure_reason
            .as_deref()
            .map(serde_json::from_str::<FailureReason>)
            .transpose()
            .map_err(|e| StorageError::InvalidData(format!("failure_reason: {e}")))?;

        Ok(Self {
            message_id: parse::<MessageId>("message_id", &row.message_id)?,
            protocol,
            source_chain: narrow("source_chain", row.source_chain)?,
            dest_chain: narrow("dest_chain", row.dest_chain)?,
            source_token: parse::<Address>("source_token", &row.source_token)?,
            dest_token: parse::<Address>("dest_token", &row.dest_token)?,
            amount: parse::<U256>("amount", &row.amount)?,
            recipient: parse::<Address>("recipient", &row.recipient)?,
            state: parse::<TransferState>("state", &row.state)?,
            message: row.message.map(Bytes::from),
            attestation: row.attestation.map(Bytes::from),
            failure_reason,
            created_at: narrow("created_at", row.created_at)?,
            last_attempt_at: row
                .last_attempt_at
                .map(|t| narrow("last_attempt_at", t))
                .transpose()?,
            attempt_count: narrow("attempt_count", row.attempt_count)?,
            version: narrow("version", row.version)?,
        })
    }
}

impl TryFrom<&TransferRecord> for TransferRow {
    type Error = StorageError;

    fn try_from(record: &TransferRecord) -> Result<Self, Self::Error> {
        let failure_reason = record
            .failure_reason
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StorageError::InvalidData(format!("failure_reason: {e}")))?;

        Ok(Self {
            message_id: record.message_id.to_string(),
            protocol: i64::from(record.protocol.id()),
            source_chain: widen("source_chain", record.source_chain)?,
            dest_chain: widen("dest_chain", record.dest_chain)?,
            source_token: record.source_token.to_string(),
            dest_token: record.dest_token.to_string(),
            amount: record.amount.to_string(),
            recipient: record.recipient.to_string(),
            state: record.state.as_str().to_string(),
            message: record.message.as_ref().map(|m| m.to_vec()),
            attestation: record.attestation.as_ref().map(|a| a.to_vec()),
            failure_reason,
            created_at: widen("created_at", record.created_at)?,
            last_attempt_at: record
                .last_attempt_at
                .map(|t| widen("last_attempt_at", t))
                .transpose()?,
            attempt_count: i64::from(record.attempt_count),
            version: widen("version", record.version)?,
        })
    }
}
