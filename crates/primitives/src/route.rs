//! Routes and the codec that derives their storage keys.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{
    protocol::Protocol,
    types::{ChainId, Domain},
};

/// Length of the packed encoding hashed into a [`RouteKey`]: two addresses and two `uint256`
/// chain ids.
const PACKED_ROUTE_LEN: usize = 20 + 32 + 20 + 32;

/// The storage key of a route.
///
/// Derived as `keccak256(abi.encodePacked(sourceToken, uint256(sourceChainId), destToken,
/// uint256(destChainId)))` so that keys computed off-ledger match the ones the router stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(B256);

impl RouteKey {
    /// Returns the underlying hash.
    pub const fn as_b256(&self) -> &B256 {
        &self.0
    }
}

/// The logical identity of a route: the 4-tuple that a [`RouteKey`] is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteId {
    /// Token sent on the source chain.
    pub source_token: Address,

    /// Chain the transfer originates from.
    pub source_chain: ChainId,

    /// Token to be delivered on the destination chain.
    pub dest_token: Address,

    /// Chain the transfer is delivered to.
    pub dest_chain: ChainId,
}

impl RouteId {
    /// Creates a new route id.
    pub const fn new(
        source_token: Address,
        source_chain: ChainId,
        dest_token: Address,
        dest_chain: ChainId,
    ) -> Self {
        Self {
            source_token,
            source_chain,
            dest_token,
            dest_chain,
        }
    }

    /// Derives the storage key for this route.
    pub fn key(&self) -> RouteKey {
        let mut packed = [0u8; PACKED_ROUTE_LEN];

        packed[..20].copy_from_slice(self.source_token.as_slice());
        packed[20..52].copy_from_slice(&U256::from(self.source_chain).to_be_bytes::<32>());
        packed[52..72].copy_from_slice(self.dest_token.as_slice());
        packed[72..].copy_from_slice(&U256::from(self.dest_chain).to_be_bytes::<32>());

        RouteKey(keccak256(packed))
    }
}

/// The routing configuration for one [`RouteId`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Route {
    /// The protocol used to bridge value along this route.
    pub protocol: Protocol,

    /// The protocol's id for the destination chain.
    pub protocol_domain: Domain,

    /// The protocol endpoint called on the source chain.
    ///
    /// When left as zero, the registry fills it in from the protocol contract registry at
    /// configuration time.
    pub bridge_contract: Address,

    /// Pool identifier, used by [`Protocol::PoolBridge`] only.
    pub pool_id: U256,

    /// Destination-side swap venue, used when the source and destination tokens differ.
    pub swap_pool: Address,

    /// Opaque protocol-specific data passed through to the bridge call.
    pub extra_data: Bytes,
}

impl Route {
    /// Creates a route for the given protocol and destination domain with every optional field
    /// left empty.
    pub fn new(protocol: Protocol, protocol_domain: Domain) -> Self {
        Self {
            protocol,
            protocol_domain,
            ..Default::default()
        }
    }

    /// Sets the bridge endpoint.
    pub fn with_bridge_contract(self, bridge_contract: Address) -> Self {
        Self {
            bridge_contract,
            ..self
        }
    }

    /// Sets the pool id.
    pub fn with_pool_id(self, pool_id: U256) -> Self {
        Self { pool_id, ..self }
    }

    /// Sets the destination swap pool.
    pub fn with_swap_pool(self, swap_pool: Address) -> Self {
        Self { swap_pool, ..self }
    }

    /// Sets the extra data.
    pub fn with_extra_data(self, extra_data: Bytes) -> Self {
        Self { extra_data, ..self }
    }

    /// Whether the route can be used to dispatch transfers.
    pub const fn is_configured(&self) -> bool {
        !self.protocol.is_none()
    }

    /// Whether a destination swap venue is set.
    pub fn has_swap_pool(&self) -> bool {
        !self.swap_pool.is_zero()
    }
}
