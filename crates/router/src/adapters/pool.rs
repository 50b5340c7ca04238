//! Adapter for the liquidity pool bridge.

use alloy_sol_types::SolCall;
use stable_router_primitives::{protocol::Protocol, Bytes};

use super::{abi::IPoolBridge, BridgeAdapter, DispatchRequest};

/// Deposits into the route's pool. A non-zero swap pool asks the destination side to swap into a
/// different pooled asset.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolBridgeAdapter;

impl BridgeAdapter for PoolBridgeAdapter {
    fn protocol(&self) -> Protocol {
        Protocol::PoolBridge
    }

    fn build_call(&self, request: &DispatchRequest<'_>) -> Bytes {
        IPoolBridge::bridgeCall {
            poolId: request.route.pool_id,
            amount: request.amount,
            dstDomain: request.route.protocol_domain,
            recipient: request.recipient,
            swapPool: request.route.swap_pool,
            payload: request.route.extra_data.clone(),
        }
        .abi_encode()
        .into()
    }
}
