//! A ledger held in memory.
//!
//! [`InMemoryLedger`] implements [`Host`] for a router deployed at a fixed address, tracks token
//! balances and allowances, hosts [`MockEndpoint`]s and records every emitted event. Checkpoints
//! snapshot the whole ledger, so a reverted dispatch leaves no trace.

mod endpoints;

use std::collections::BTreeMap;

pub use endpoints::MockEndpoint;
use stable_router_primitives::{
    events::ObservedTransfer,
    message::message_id_of,
    types::{ChainId, MessageId},
    Address, Bytes, U256,
};

use crate::{
    events::{BridgeEvent, LedgerEvent, RouterEvent},
    host::{Host, HostError},
};

/// Token balances, allowances and endpoint nonces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LedgerState {
    /// Keyed by (token, holder).
    balances: BTreeMap<(Address, Address), U256>,
    /// Keyed by (token, owner, spender).
    allowances: BTreeMap<(Address, Address, Address), U256>,
    /// Next nonce of each endpoint.
    nonces: BTreeMap<Address, u64>,
}

impl LedgerState {
    fn balance(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn credit(&mut self, token: Address, holder: Address, amount: U256) {
        let balance = self.balances.entry((token, holder)).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub(crate) fn burn(
        &mut self,
        token: Address,
        holder: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        let have = self.balance(token, holder);
        if have < amount {
            return Err(HostError::InsufficientBalance { have, need: amount });
        }

        self.balances.insert((token, holder), have - amount);

        Ok(())
    }

    fn set_allowance(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Moves `amount` of `owner`'s `token` to `to` on behalf of `spender`.
    pub(crate) fn transfer_from(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        let allowance = self.allowance(token, owner, spender);
        if allowance < amount {
            return Err(HostError::InsufficientAllowance {
                have: allowance,
                need: amount,
            });
        }

        self.burn(token, owner, amount)?;
        self.credit(token, to, amount);
        self.set_allowance(token, owner, spender, allowance - amount);

        Ok(())
    }

    pub(crate) fn next_nonce(&mut self, endpoint: Address) -> u64 {
        let nonce = self.nonces.entry(endpoint).or_default();
        let current = *nonce;
        *nonce += 1;

        current
    }
}

/// A single-chain ledger held in memory with a router deployed on it.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    chain_id: ChainId,
    router: Address,
    state: LedgerState,
    endpoints: BTreeMap<Address, MockEndpoint>,
    logs: Vec<LedgerEvent>,
    journal: Vec<(LedgerState, usize)>,
}

impl InMemoryLedger {
    /// Creates an empty ledger for `chain_id` with the router deployed at `router`.
    pub fn new(chain_id: ChainId, router: Address) -> Self {
        Self {
            chain_id,
            router,
            state: LedgerState::default(),
            endpoints: BTreeMap::new(),
            logs: Vec::new(),
            journal: Vec::new(),
        }
    }

    /// Deploys a mock bridge endpoint at `address`.
    pub fn deploy(&mut self, address: Address, endpoint: MockEndpoint) {
        self.endpoints.insert(address, endpoint);
    }

    /// Creates `amount` of `token` for `to`.
    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        self.state.credit(token, to, amount);
    }

    /// Allows `spender` to move `amount` of `owner`'s `token`, as `owner` would on chain.
    pub fn approve_as(&mut self, owner: Address, token: Address, spender: Address, amount: U256) {
        self.state.set_allowance(token, owner, spender, amount);
    }

    /// The `token` balance of `holder`.
    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.state.balance(token, holder)
    }

    /// How much of `owner`'s `token` `spender` may move.
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state.allowance(token, owner, spender)
    }

    /// Every event emitted so far, in order.
    pub fn logs(&self) -> &[LedgerEvent] {
        &self.logs
    }

    /// The router's `TransferInitiated` events, each joined with the burn/mint message emitted
    /// for it if there is one.
    pub fn observed_transfers(&self) -> Vec<ObservedTransfer> {
        let mut messages: BTreeMap<MessageId, Bytes> = BTreeMap::new();
        let mut observed = Vec::new();

        for log in &self.logs {
            match log {
                LedgerEvent::Bridge {
                    event: BridgeEvent::MessageSent { message },
                    ..
                } => {
                    messages.insert(message_id_of(message), message.clone());
                }
                LedgerEvent::Router(RouterEvent::TransferInitiated(event)) => {
                    observed.push(ObservedTransfer {
                        source_chain: self.chain_id,
                        event: event.clone(),
                        message: messages.get(&event.message_id).cloned(),
                    });
                }
                _ => {}
            }
        }

        observed
    }
}

impl Host for InMemoryLedger {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    fn address(&self) -> Address {
        self.router
    }

    fn checkpoint(&mut self) {
        self.journal.push((self.state.clone(), self.logs.len()));
    }

    fn commit(&mut self) {
        self.journal.pop();
    }

    fn revert(&mut self) {
        if let Some((state, logs_len)) = self.journal.pop() {
            self.state = state;
            self.logs.truncate(logs_len);
        }
    }

    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        self.state
            .transfer_from(token, from, self.router, self.router, amount)
    }

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), HostError> {
        self.state.set_allowance(token, self.router, spender, amount);

        Ok(())
    }

    fn call(&mut self, target: Address, calldata: Bytes) -> Result<Bytes, HostError> {
        let endpoint = self
            .endpoints
            .get(&target)
            .cloned()
            .ok_or(HostError::NoContract(target))?;

        let (return_data, event) =
            endpoint.handle(target, &mut self.state, self.router, &calldata)?;
        self.logs.push(LedgerEvent::Bridge {
            emitter: target,
            event,
        });

        Ok(return_data)
    }

    fn emit(&mut self, event: RouterEvent) {
        self.logs.push(LedgerEvent::Router(event));
    }
}
