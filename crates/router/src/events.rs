//! Events emitted on the ledger.

use stable_router_primitives::{
    events::TransferInitiated,
    protocol::Protocol,
    route::{RouteId, RouteKey},
    types::{ChainId, Domain, MessageId},
    Address, Bytes, U256,
};

/// Events emitted by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    /// A route was created or replaced.
    RouteConfigured {
        /// The key the route is stored under.
        key: RouteKey,
        /// The route's identity.
        id: RouteId,
        /// The route's protocol.
        protocol: Protocol,
        /// The protocol's id for the destination chain.
        protocol_domain: Domain,
        /// The endpoint transfers along this route are sent to.
        bridge_contract: Address,
    },

    /// A bridge endpoint was registered.
    ProtocolContractSet {
        /// The protocol.
        protocol: Protocol,
        /// The chain the endpoint lives on.
        chain_id: ChainId,
        /// The endpoint.
        contract: Address,
    },

    /// A transfer was dispatched.
    TransferInitiated(TransferInitiated),

    /// Transfers were paused.
    Paused {
        /// The owner that paused the router.
        by: Address,
    },

    /// Transfers were resumed.
    Unpaused {
        /// The owner that unpaused the router.
        by: Address,
    },

    /// The owner capability moved to a new account.
    OwnershipTransferred {
        /// The previous owner.
        previous: Address,
        /// The new owner.
        new: Address,
    },
}

/// Events emitted by bridge endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A burn/mint message was sent.
    MessageSent {
        /// The encoded message. Its hash is the message id.
        message: Bytes,
    },

    /// An omnichain token transfer was sent.
    OftSent {
        /// The endpoint-assigned message guid.
        guid: MessageId,
        /// Destination endpoint id.
        dst_eid: u32,
        /// Account the tokens were debited from.
        from: Address,
        /// Amount sent.
        amount: U256,
    },

    /// Tokens were swapped into a pool for delivery on another chain.
    PoolSwapped {
        /// The pool-assigned transfer id.
        transfer_id: MessageId,
        /// Pool the tokens were deposited into.
        pool_id: U256,
        /// Amount deposited.
        amount: U256,
        /// Account credited on the destination chain.
        recipient: Address,
    },
}

/// Any event recorded by a ledger, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Emitted by the router.
    Router(RouterEvent),

    /// Emitted by a bridge endpoint.
    Bridge {
        /// The endpoint that emitted the event.
        emitter: Address,
        /// The event.
        event: BridgeEvent,
    },
}
