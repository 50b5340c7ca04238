//! Owner-controlled registries of bridge endpoints and routes.

use std::collections::BTreeMap;

use stable_router_primitives::{
    protocol::Protocol,
    route::{Route, RouteId, RouteKey},
    types::ChainId,
    Address,
};

use crate::errors::{RouterError, RouterResult};

/// The router's persistent configuration.
///
/// Every mutation is gated on the caller being the owner and is rejected without side effects
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    owner: Address,
    paused: bool,
    protocol_contracts: BTreeMap<(Protocol, ChainId), Address>,
    routes: BTreeMap<RouteKey, Route>,
}

impl Registry {
    /// Creates an empty, unpaused registry owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            ..Default::default()
        }
    }

    /// The current owner.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Whether transfers are paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    fn ensure_owner(&self, caller: Address) -> RouterResult<()> {
        if caller != self.owner {
            return Err(RouterError::Unauthorized(caller));
        }

        Ok(())
    }

    /// Registers the bridge endpoint of `protocol` on `chain_id`, replacing any previous one.
    pub fn set_protocol_contract(
        &mut self,
        caller: Address,
        protocol: Protocol,
        chain_id: ChainId,
        contract: Address,
    ) -> RouterResult<()> {
        self.ensure_owner(caller)?;

        if protocol.is_none() {
            return Err(RouterError::InvalidProtocol);
        }

        if contract.is_zero() {
            return Err(RouterError::InvalidAddress);
        }

        self.protocol_contracts.insert((protocol, chain_id), contract);

        Ok(())
    }

    /// The bridge endpoint of `protocol` on `chain_id`, if one is registered.
    pub fn protocol_contract(&self, protocol: Protocol, chain_id: ChainId) -> Option<Address> {
        self.protocol_contracts.get(&(protocol, chain_id)).copied()
    }

    /// Stores `route` under the key of `id`, replacing any previous route.
    ///
    /// A zero [`Route::bridge_contract`] is filled in from the registered endpoint. Returns the
    /// key and the route as stored.
    pub fn configure_route(
        &mut self,
        caller: Address,
        id: RouteId,
        route: Route,
    ) -> RouterResult<(RouteKey, Route)> {
        self.ensure_owner(caller)?;

        if route.protocol.is_none() {
            return Err(RouterError::InvalidProtocol);
        }

        let registered = self
            .protocol_contract(route.protocol, id.source_chain)
            .ok_or(RouterError::ProtocolNotConfigured {
                protocol: route.protocol,
                chain_id: id.source_chain,
            })?;

        let route = if route.bridge_contract.is_zero() {
            route.with_bridge_contract(registered)
        } else {
            route
        };

        let key = id.key();
        self.routes.insert(key, route.clone());

        Ok((key, route))
    }

    /// The route stored under `key`.
    pub fn route(&self, key: &RouteKey) -> Option<&Route> {
        self.routes.get(key)
    }

    /// Whether a dispatchable route exists for exactly this 4-tuple.
    pub fn is_route_configured(&self, id: &RouteId) -> bool {
        self.route(&id.key()).is_some_and(Route::is_configured)
    }

    /// Sets the paused flag. Returns whether the flag changed.
    pub fn set_paused(&mut self, caller: Address, paused: bool) -> RouterResult<bool> {
        self.ensure_owner(caller)?;

        let changed = self.paused != paused;
        self.paused = paused;

        Ok(changed)
    }

    /// Moves the owner capability to `new_owner`. Returns the previous owner.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> RouterResult<Address> {
        self.ensure_owner(caller)?;

        if new_owner.is_zero() {
            return Err(RouterError::InvalidAddress);
        }

        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}
