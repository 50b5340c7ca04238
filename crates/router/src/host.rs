//! The interface between the router and the ledger it runs on.

use stable_router_primitives::{types::ChainId, Address, Bytes, U256};
use thiserror::Error;

use crate::events::RouterEvent;

/// Errors raised by the ledger while executing a host operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The holder does not have enough tokens.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Current balance.
        have: U256,
        /// Required balance.
        need: U256,
    },

    /// The spender is not allowed to move enough of the owner's tokens.
    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance {
        /// Current allowance.
        have: U256,
        /// Required allowance.
        need: U256,
    },

    /// The call target has no code.
    #[error("no contract at {0}")]
    NoContract(Address),

    /// The callee reverted.
    #[error("execution reverted: {0}")]
    Reverted(String),
}

/// The ledger operations available to the router.
///
/// Every operation acts on behalf of the router's own address ([`Host::address`]). Effects are
/// journaled: [`Host::checkpoint`] opens a frame that is later closed by exactly one of
/// [`Host::commit`] or [`Host::revert`].
pub trait Host {
    /// The chain the router is deployed on.
    fn chain_id(&self) -> ChainId;

    /// The router's own address. Transferred tokens are held in custody here.
    fn address(&self) -> Address;

    /// Opens a journal frame.
    fn checkpoint(&mut self);

    /// Keeps every effect since the matching [`Host::checkpoint`].
    fn commit(&mut self);

    /// Discards every effect since the matching [`Host::checkpoint`].
    fn revert(&mut self);

    /// Moves `amount` of `token` from `from` into the router's custody, spending the allowance
    /// that `from` granted to the router.
    fn transfer_from(&mut self, token: Address, from: Address, amount: U256)
        -> Result<(), HostError>;

    /// Allows `spender` to move `amount` of the router's `token`.
    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), HostError>;

    /// Calls `target` with ABI-encoded `calldata` and returns the ABI-encoded return data.
    fn call(&mut self, target: Address, calldata: Bytes) -> Result<Bytes, HostError>;

    /// Emits a router event.
    fn emit(&mut self, event: RouterEvent);
}
