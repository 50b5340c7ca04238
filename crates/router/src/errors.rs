//! Errors returned by the router's entrypoints.

use stable_router_primitives::{protocol::Protocol, route::RouteKey, types::ChainId, Address};
use thiserror::Error;

use crate::host::HostError;

/// The result type of router entrypoints.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors returned by the router.
///
/// Configuration errors are returned before any state is touched. Dispatch errors roll back every
/// effect of the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The caller is not the owner.
    #[error("caller {0} is not the owner")]
    Unauthorized(Address),

    /// A zero address was supplied where a contract or account is required.
    #[error("invalid address")]
    InvalidAddress,

    /// [`Protocol::None`] was supplied where a real protocol is required.
    #[error("invalid protocol")]
    InvalidProtocol,

    /// No bridge endpoint is registered for the protocol on the chain.
    #[error("protocol {protocol} is not configured on chain {chain_id}")]
    ProtocolNotConfigured {
        /// The protocol.
        protocol: Protocol,
        /// The chain.
        chain_id: ChainId,
    },

    /// No route is configured for the requested token and chain pair.
    #[error("no route configured for key {0:?}")]
    RouteNotConfigured(RouteKey),

    /// The transfer amount is zero.
    #[error("invalid amount")]
    InvalidAmount,

    /// The recipient is the zero address.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// The source tokens could not be pulled into custody.
    #[error("token transfer failed: {0}")]
    TransferFailed(HostError),

    /// The router is paused.
    #[error("router is paused")]
    Paused,

    /// The bridge endpoint rejected the call or returned an unusable result.
    #[error("bridge call failed: {0}")]
    BridgeCallFailed(String),
}
