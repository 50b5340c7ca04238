//! The router's entrypoints: owner-gated configuration and transfer dispatch.

use stable_router_primitives::{
    events::TransferInitiated,
    protocol::Protocol,
    route::{Route, RouteId, RouteKey},
    types::{ChainId, MessageId},
    Address, U256,
};
use tracing::{debug, info, warn};

use crate::{
    adapters::{AdapterTable, BridgeAdapter, DispatchRequest},
    errors::{RouterError, RouterResult},
    events::RouterEvent,
    host::Host,
    registry::Registry,
};

/// The stable router.
#[derive(Debug)]
pub struct StableRouter {
    registry: Registry,
    adapters: AdapterTable,
}

impl StableRouter {
    /// Creates a router owned by `owner` with an adapter for every dispatchable protocol.
    pub fn new(owner: Address) -> Self {
        Self::with_adapters(owner, AdapterTable::default())
    }

    /// Creates a router owned by `owner` that dispatches through `adapters`.
    pub fn with_adapters(owner: Address, adapters: AdapterTable) -> Self {
        Self {
            registry: Registry::new(owner),
            adapters,
        }
    }

    /// The router's configuration.
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Derives the storage key of a route.
    pub fn route_key(
        &self,
        source_token: Address,
        source_chain: ChainId,
        dest_token: Address,
        dest_chain: ChainId,
    ) -> RouteKey {
        RouteId::new(source_token, source_chain, dest_token, dest_chain).key()
    }

    /// Whether a dispatchable route exists for exactly this 4-tuple.
    pub fn is_route_configured(
        &self,
        source_token: Address,
        source_chain: ChainId,
        dest_token: Address,
        dest_chain: ChainId,
    ) -> bool {
        self.registry.is_route_configured(&RouteId::new(
            source_token,
            source_chain,
            dest_token,
            dest_chain,
        ))
    }

    /// Registers the bridge endpoint of `protocol` on `chain_id`.
    pub fn set_protocol_contract(
        &mut self,
        host: &mut impl Host,
        caller: Address,
        protocol: Protocol,
        chain_id: ChainId,
        contract: Address,
    ) -> RouterResult<()> {
        self.registry
            .set_protocol_contract(caller, protocol, chain_id, contract)?;

        info!(%protocol, %chain_id, %contract, "protocol contract set");
        host.emit(RouterEvent::ProtocolContractSet {
            protocol,
            chain_id,
            contract,
        });

        Ok(())
    }

    /// Creates or replaces the route from `source_token` on `source_chain` to `dest_token` on
    /// `dest_chain`.
    ///
    /// Replacing a route only affects transfers dispatched afterwards.
    pub fn configure_route(
        &mut self,
        host: &mut impl Host,
        caller: Address,
        id: RouteId,
        route: Route,
    ) -> RouterResult<RouteKey> {
        let (key, route) = self.registry.configure_route(caller, id, route)?;

        info!(
            ?key,
            protocol = %route.protocol,
            domain = route.protocol_domain,
            bridge = %route.bridge_contract,
            "route configured"
        );
        host.emit(RouterEvent::RouteConfigured {
            key,
            id,
            protocol: route.protocol,
            protocol_domain: route.protocol_domain,
            bridge_contract: route.bridge_contract,
        });

        Ok(key)
    }

    /// Blocks transfers until [`Self::unpause`] is called.
    pub fn pause(&mut self, host: &mut impl Host, caller: Address) -> RouterResult<()> {
        if self.registry.set_paused(caller, true)? {
            warn!(by = %caller, "router paused");
            host.emit(RouterEvent::Paused { by: caller });
        }

        Ok(())
    }

    /// Resumes transfers.
    pub fn unpause(&mut self, host: &mut impl Host, caller: Address) -> RouterResult<()> {
        if self.registry.set_paused(caller, false)? {
            info!(by = %caller, "router unpaused");
            host.emit(RouterEvent::Unpaused { by: caller });
        }

        Ok(())
    }

    /// Hands the owner capability to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        host: &mut impl Host,
        caller: Address,
        new_owner: Address,
    ) -> RouterResult<()> {
        let previous = self.registry.transfer_ownership(caller, new_owner)?;

        info!(%previous, new = %new_owner, "ownership transferred");
        host.emit(RouterEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        });

        Ok(())
    }

    /// Bridges `amount` of `source_token` to `recipient` on `dest_chain`, to be delivered as
    /// `dest_token`.
    ///
    /// The caller must have allowed the router to move `amount` of `source_token`. The call is
    /// all-or-nothing: on error, no tokens move and no events are emitted.
    #[expect(clippy::too_many_arguments)]
    pub fn transfer(
        &self,
        host: &mut impl Host,
        caller: Address,
        source_token: Address,
        dest_token: Address,
        amount: U256,
        dest_chain: ChainId,
        recipient: Address,
    ) -> RouterResult<MessageId> {
        if self.registry.is_paused() {
            return Err(RouterError::Paused);
        }

        let key = RouteId::new(source_token, host.chain_id(), dest_token, dest_chain).key();
        let route = self
            .registry
            .route(&key)
            .filter(|route| route.is_configured())
            .ok_or(RouterError::RouteNotConfigured(key))?;

        if amount.is_zero() {
            return Err(RouterError::InvalidAmount);
        }

        if recipient.is_zero() {
            return Err(RouterError::InvalidRecipient);
        }

        let adapter = self
            .adapters
            .get(route.protocol)
            .ok_or(RouterError::ProtocolNotConfigured {
                protocol: route.protocol,
                chain_id: host.chain_id(),
            })?;

        let request = DispatchRequest {
            route,
            source_token,
            dest_token,
            amount,
            dest_chain,
            recipient,
        };

        host.checkpoint();
        match self.dispatch(host, adapter, caller, &request) {
            Ok(message_id) => {
                host.commit();
                info!(
                    %message_id,
                    %caller,
                    protocol = %route.protocol,
                    %dest_chain,
                    %amount,
                    "transfer initiated"
                );

                Ok(message_id)
            }
            Err(err) => {
                host.revert();
                debug!(%caller, ?key, %err, "transfer rolled back");

                Err(err)
            }
        }
    }

    fn dispatch(
        &self,
        host: &mut impl Host,
        adapter: &dyn BridgeAdapter,
        caller: Address,
        request: &DispatchRequest<'_>,
    ) -> RouterResult<MessageId> {
        let route = request.route;
        let endpoint = if route.bridge_contract.is_zero() {
            self.registry
                .protocol_contract(route.protocol, host.chain_id())
                .ok_or(RouterError::ProtocolNotConfigured {
                    protocol: route.protocol,
                    chain_id: host.chain_id(),
                })?
        } else {
            route.bridge_contract
        };

        host.transfer_from(request.source_token, caller, request.amount)
            .map_err(RouterError::TransferFailed)?;

        host.approve(request.source_token, endpoint, request.amount)
            .map_err(|e| RouterError::BridgeCallFailed(e.to_string()))?;

        let return_data = host
            .call(endpoint, adapter.build_call(request))
            .map_err(|e| RouterError::BridgeCallFailed(e.to_string()))?;

        let message_id = adapter.parse_message_id(&return_data)?;

        host.emit(RouterEvent::TransferInitiated(TransferInitiated {
            message_id,
            sender: caller,
            source_token: request.source_token,
            dest_token: request.dest_token,
            amount: request.amount,
            dest_chain: request.dest_chain,
            recipient: request.recipient,
            protocol: route.protocol,
        }));

        Ok(message_id)
    }
}
