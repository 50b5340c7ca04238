//! Protocol adapters.
//!
//! An adapter knows how to encode a dispatch along a route into a call to its protocol's bridge
//! endpoint and how to read the message identifier back from the call's return data. The router
//! keeps one adapter per [`Protocol`] in an [`AdapterTable`].

pub mod abi;
mod burn_mint;
mod oft;
mod pool;

use std::{collections::BTreeMap, fmt};

use alloy_sol_types::SolValue;
use stable_router_primitives::{
    protocol::Protocol,
    route::Route,
    types::{ChainId, MessageId},
    Address, Bytes, B256, U256,
};

pub use self::{
    burn_mint::{BurnMintAdapter, BurnMintWithHookAdapter},
    oft::OftAdapter,
    pool::PoolBridgeAdapter,
};
use crate::errors::{RouterError, RouterResult};

/// The parameters of a single dispatch.
#[derive(Debug, Clone, Copy)]
pub struct DispatchRequest<'a> {
    /// The route being dispatched along.
    pub route: &'a Route,

    /// The token held in custody and handed to the endpoint.
    pub source_token: Address,

    /// The token requested on the destination chain.
    pub dest_token: Address,

    /// Amount to bridge.
    pub amount: U256,

    /// The destination chain.
    pub dest_chain: ChainId,

    /// Account credited on the destination chain.
    pub recipient: Address,
}

/// Encodes dispatches for one bridge protocol.
pub trait BridgeAdapter: fmt::Debug + Send + Sync {
    /// The protocol this adapter handles.
    fn protocol(&self) -> Protocol;

    /// The ABI-encoded call to the route's bridge endpoint.
    fn build_call(&self, request: &DispatchRequest<'_>) -> Bytes;

    /// Extracts the message identifier from the endpoint's return data.
    fn parse_message_id(&self, return_data: &[u8]) -> RouterResult<MessageId> {
        parse_bytes32_id(return_data)
    }
}

/// Reads a non-zero `bytes32` identifier from ABI-encoded return data.
fn parse_bytes32_id(return_data: &[u8]) -> RouterResult<MessageId> {
    let id = B256::abi_decode(return_data)
        .map_err(|e| RouterError::BridgeCallFailed(format!("malformed return data: {e}")))?;

    if id.is_zero() {
        return Err(RouterError::BridgeCallFailed(
            "endpoint returned an empty message id".to_string(),
        ));
    }

    Ok(id.into())
}

/// Left-pads an address into the 32-byte account encoding used by bridge messages.
fn address_to_bytes32(address: Address) -> B256 {
    address.into_word()
}

/// The dispatch table from protocol to adapter.
#[derive(Debug)]
pub struct AdapterTable(BTreeMap<Protocol, Box<dyn BridgeAdapter>>);

impl AdapterTable {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds an adapter, replacing any adapter registered for the same protocol.
    pub fn with(mut self, adapter: impl BridgeAdapter + 'static) -> Self {
        self.0.insert(adapter.protocol(), Box::new(adapter));
        self
    }

    /// The adapter for `protocol`.
    pub fn get(&self, protocol: Protocol) -> Option<&dyn BridgeAdapter> {
        self.0.get(&protocol).map(Box::as_ref)
    }

    /// The protocols that have an adapter.
    pub fn protocols(&self) -> impl Iterator<Item = Protocol> + '_ {
        self.0.keys().copied()
    }
}

impl Default for AdapterTable {
    /// A table with an adapter for every dispatchable protocol.
    fn default() -> Self {
        Self::empty()
            .with(BurnMintAdapter)
            .with(BurnMintWithHookAdapter)
            .with(OftAdapter)
            .with(PoolBridgeAdapter)
    }
}
