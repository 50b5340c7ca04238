//! Mock bridge endpoints.
//!
//! Each endpoint decodes the router's call, pulls the approved tokens from the caller and emits
//! the event its real counterpart would, returning the protocol's message identifier.

use alloy_primitives::keccak256;
use alloy_sol_types::{SolCall, SolInterface, SolValue};
use stable_router_primitives::{
    message::{message_id_of, BurnBody, BurnMessage},
    types::{Domain, MessageId},
    Address, Bytes, B256,
};

use super::LedgerState;
use crate::{
    adapters::abi::{IOftEndpoint, IPoolBridge, ITokenMessenger::ITokenMessengerCalls},
    events::BridgeEvent,
    host::HostError,
};

/// Message format version emitted by [`MockEndpoint::BurnMint`].
const MESSAGE_VERSION: u32 = 1;

/// Burn body format version emitted by [`MockEndpoint::BurnMint`].
const BURN_BODY_VERSION: u32 = 1;

/// A bridge endpoint deployed on an [`InMemoryLedger`](super::InMemoryLedger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEndpoint {
    /// A burn/mint token messenger on the chain with the given domain. Burns any token it is
    /// asked to and emits a [`BridgeEvent::MessageSent`].
    BurnMint {
        /// The messenger's own domain.
        local_domain: Domain,
    },

    /// An omnichain token endpoint for `token`.
    Oft {
        /// The token sent through the endpoint.
        token: Address,
    },

    /// A liquidity pool bridge for `token`. Deposited tokens stay with the pool.
    PoolBridge {
        /// The pooled token.
        token: Address,
    },

    /// An endpoint that reverts every call.
    Reverting {
        /// The revert reason.
        reason: String,
    },
}

impl MockEndpoint {
    /// Executes a call from `caller` to the endpoint deployed at `this`.
    pub(super) fn handle(
        &self,
        this: Address,
        state: &mut LedgerState,
        caller: Address,
        calldata: &[u8],
    ) -> Result<(Bytes, BridgeEvent), HostError> {
        match self {
            MockEndpoint::BurnMint { local_domain } => {
                deposit_for_burn(*local_domain, this, state, caller, calldata)
            }
            MockEndpoint::Oft { token } => oft_send(*token, this, state, caller, calldata),
            MockEndpoint::PoolBridge { token } => {
                pool_bridge(*token, this, state, caller, calldata)
            }
            MockEndpoint::Reverting { reason } => Err(HostError::Reverted(reason.clone())),
        }
    }
}

fn invalid_calldata(err: alloy_sol_types::Error) -> HostError {
    HostError::Reverted(format!("invalid calldata: {err}"))
}

fn id_return(id: MessageId) -> Bytes {
    id.as_b256().abi_encode().into()
}

fn deposit_for_burn(
    local_domain: Domain,
    this: Address,
    state: &mut LedgerState,
    caller: Address,
    calldata: &[u8],
) -> Result<(Bytes, BridgeEvent), HostError> {
    let (amount, dest_domain, mint_recipient, burn_token, hook_data) =
        match ITokenMessengerCalls::abi_decode(calldata).map_err(invalid_calldata)? {
            ITokenMessengerCalls::depositForBurn(call) => (
                call.amount,
                call.destinationDomain,
                call.mintRecipient,
                call.burnToken,
                Bytes::new(),
            ),
            ITokenMessengerCalls::depositForBurnWithHook(call) => (
                call.amount,
                call.destinationDomain,
                call.mintRecipient,
                call.burnToken,
                call.hookData,
            ),
        };

    if amount.is_zero() {
        return Err(HostError::Reverted("amount must be nonzero".to_string()));
    }

    if mint_recipient.is_zero() {
        return Err(HostError::Reverted("mint recipient must be nonzero".to_string()));
    }

    state.transfer_from(burn_token, caller, this, this, amount)?;
    state.burn(burn_token, this, amount)?;

    let message = BurnMessage {
        version: MESSAGE_VERSION,
        source_domain: local_domain,
        dest_domain,
        nonce: state.next_nonce(this),
        sender: this.into_word(),
        recipient: this.into_word(),
        destination_caller: B256::ZERO,
        body: BurnBody {
            version: BURN_BODY_VERSION,
            burn_token: burn_token.into_word(),
            mint_recipient,
            amount,
            message_sender: caller.into_word(),
            hook_data,
        },
    }
    .encode();

    let message_id = message_id_of(&message);

    Ok((id_return(message_id), BridgeEvent::MessageSent { message }))
}

fn oft_send(
    token: Address,
    this: Address,
    state: &mut LedgerState,
    caller: Address,
    calldata: &[u8],
) -> Result<(Bytes, BridgeEvent), HostError> {
    let call = IOftEndpoint::sendCall::abi_decode(calldata).map_err(invalid_calldata)?;

    state.transfer_from(token, caller, this, this, call.amountLD)?;
    state.burn(token, this, call.amountLD)?;

    let nonce = state.next_nonce(this);
    let mut preimage = Vec::with_capacity(4 + 8 + 32);
    preimage.extend_from_slice(&call.dstEid.to_be_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(call.to.as_slice());
    let guid = MessageId::new(keccak256(preimage));

    Ok((
        id_return(guid),
        BridgeEvent::OftSent {
            guid,
            dst_eid: call.dstEid,
            from: caller,
            amount: call.amountLD,
        },
    ))
}

fn pool_bridge(
    token: Address,
    this: Address,
    state: &mut LedgerState,
    caller: Address,
    calldata: &[u8],
) -> Result<(Bytes, BridgeEvent), HostError> {
    let call = IPoolBridge::bridgeCall::abi_decode(calldata).map_err(invalid_calldata)?;

    state.transfer_from(token, caller, this, this, call.amount)?;

    let nonce = state.next_nonce(this);
    let mut preimage = Vec::with_capacity(32 + 8 + 20);
    preimage.extend_from_slice(&call.poolId.to_be_bytes::<32>());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(call.recipient.as_slice());
    let transfer_id = MessageId::new(keccak256(preimage));

    Ok((
        id_return(transfer_id),
        BridgeEvent::PoolSwapped {
            transfer_id,
            pool_id: call.poolId,
            amount: call.amount,
            recipient: call.recipient,
        },
    ))
}
