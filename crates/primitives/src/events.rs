//! Events emitted by the router that link an on-ledger dispatch to the off-ledger relayer.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    protocol::Protocol,
    types::{ChainId, MessageId},
};

/// Emitted by the dispatcher once a bridge call has been made.
///
/// This is the only link between a `transfer` call and the relayer that completes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInitiated {
    /// The protocol-assigned identifier of the bridged message.
    pub message_id: MessageId,

    /// Account that initiated the transfer.
    pub sender: Address,

    /// Token pulled into custody on the source chain.
    pub source_token: Address,

    /// Token requested on the destination chain.
    pub dest_token: Address,

    /// Amount pulled into custody.
    pub amount: U256,

    /// Destination chain.
    pub dest_chain: ChainId,

    /// Account credited on the destination chain.
    pub recipient: Address,

    /// Protocol the transfer was dispatched through.
    pub protocol: Protocol,
}

/// A [`TransferInitiated`] event as seen by an observer of the source chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedTransfer {
    /// The chain the event was emitted on.
    pub source_chain: ChainId,

    /// The dispatch event.
    pub event: TransferInitiated,

    /// The raw protocol message emitted alongside the dispatch event, if the observer captured
    /// it.
    #[serde(default)]
    pub message: Option<Bytes>,
}
