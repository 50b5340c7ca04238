//! Adapter for the omnichain fungible token endpoint.

use alloy_sol_types::SolCall;
use stable_router_primitives::{protocol::Protocol, Bytes};

use super::{abi::IOftEndpoint, address_to_bytes32, BridgeAdapter, DispatchRequest};

/// Sends the token through the endpoint, addressing the destination by the route's domain as
/// endpoint id and composing the route's extra data.
#[derive(Debug, Clone, Copy, Default)]
pub struct OftAdapter;

impl BridgeAdapter for OftAdapter {
    fn protocol(&self) -> Protocol {
        Protocol::OmnichainOft
    }

    fn build_call(&self, request: &DispatchRequest<'_>) -> Bytes {
        IOftEndpoint::sendCall {
            dstEid: request.route.protocol_domain,
            to: address_to_bytes32(request.recipient),
            amountLD: request.amount,
            composeMsg: request.route.extra_data.clone(),
        }
        .abi_encode()
        .into()
    }
}
