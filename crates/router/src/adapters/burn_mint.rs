//! Adapters for the burn/mint messenger.

use alloy_sol_types::{SolCall, SolValue};
use stable_router_primitives::{protocol::Protocol, Bytes};

use super::{
    abi::{HookPayload, ITokenMessenger},
    address_to_bytes32, BridgeAdapter, DispatchRequest,
};

/// Burns the source token and mints the same token to the recipient on the destination chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct BurnMintAdapter;

impl BridgeAdapter for BurnMintAdapter {
    fn protocol(&self) -> Protocol {
        Protocol::BurnMint
    }

    fn build_call(&self, request: &DispatchRequest<'_>) -> Bytes {
        ITokenMessenger::depositForBurnCall {
            amount: request.amount,
            destinationDomain: request.route.protocol_domain,
            mintRecipient: address_to_bytes32(request.recipient),
            burnToken: request.source_token,
        }
        .abi_encode()
        .into()
    }
}

/// Like [`BurnMintAdapter`], with a hook that swaps into the destination token after minting.
#[derive(Debug, Clone, Copy, Default)]
pub struct BurnMintWithHookAdapter;

impl BridgeAdapter for BurnMintWithHookAdapter {
    fn protocol(&self) -> Protocol {
        Protocol::BurnMintWithHook
    }

    fn build_call(&self, request: &DispatchRequest<'_>) -> Bytes {
        let hook = HookPayload {
            swapPool: request.route.swap_pool,
            destToken: request.dest_token,
            recipient: request.recipient,
            extraData: request.route.extra_data.clone(),
        };

        ITokenMessenger::depositForBurnWithHookCall {
            amount: request.amount,
            destinationDomain: request.route.protocol_domain,
            mintRecipient: address_to_bytes32(request.recipient),
            burnToken: request.source_token,
            hookData: hook.abi_encode().into(),
        }
        .abi_encode()
        .into()
    }
}
