//! The bridging protocols a route can be dispatched through.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// The bridge protocol that a route uses.
///
/// The discriminants match the ids used by the deployed router so that values read from chain
/// state can be converted with [`Protocol::try_from`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Protocol {
    /// No protocol. A route with this protocol is considered unconfigured.
    #[default]
    None = 0,

    /// Native burn-and-mint messaging.
    BurnMint = 1,

    /// Burn-and-mint with a hook payload executed by the destination receiver after minting.
    BurnMintWithHook = 2,

    /// Omnichain fungible token transfer through a messaging endpoint.
    OmnichainOft = 3,

    /// Liquidity-pool based bridge.
    PoolBridge = 4,
}

impl Protocol {
    /// All protocols that can be used for dispatch, i.e., every variant except [`Protocol::None`].
    pub const DISPATCHABLE: [Protocol; 4] = [
        Protocol::BurnMint,
        Protocol::BurnMintWithHook,
        Protocol::OmnichainOft,
        Protocol::PoolBridge,
    ];

    /// Whether this is the [`Protocol::None`] placeholder.
    pub const fn is_none(&self) -> bool {
        matches!(self, Protocol::None)
    }

    /// Whether messages sent through this protocol need an off-chain attestation before they can
    /// be received on the destination chain.
    ///
    /// Only these protocols are tracked by the relayer. The others are completed by the protocol's
    /// own executor network.
    pub const fn requires_attestation(&self) -> bool {
        matches!(self, Protocol::BurnMint | Protocol::BurnMintWithHook)
    }

    /// The numeric id of this protocol.
    pub const fn id(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Protocol {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Protocol::None),
            1 => Ok(Protocol::BurnMint),
            2 => Ok(Protocol::BurnMintWithHook),
            3 => Ok(Protocol::OmnichainOft),
            4 => Ok(Protocol::PoolBridge),
            other => Err(ParseError::UnknownProtocol(other)),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::None => "none",
            Protocol::BurnMint => "burn_mint",
            Protocol::BurnMintWithHook => "burn_mint_with_hook",
            Protocol::OmnichainOft => "omnichain_oft",
            Protocol::PoolBridge => "pool_bridge",
        };

        f.write_str(name)
    }
}

/// How quickly a source chain's messages are expected to be attested.
///
/// This bounds how long the relayer waits between attestation polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyClass {
    /// Soft-finality path; attestations are usually available within seconds.
    Fast,

    /// Hard-finality path; attestations may take many minutes.
    Standard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_ids_round_trip() {
        for protocol in Protocol::DISPATCHABLE.into_iter().chain([Protocol::None]) {
            assert_eq!(Protocol::try_from(protocol.id()), Ok(protocol));
        }

        assert_eq!(Protocol::try_from(5), Err(ParseError::UnknownProtocol(5)));
    }

    #[test]
    fn only_burn_mint_protocols_require_attestation() {
        assert!(Protocol::BurnMint.requires_attestation());
        assert!(Protocol::BurnMintWithHook.requires_attestation());
        assert!(!Protocol::OmnichainOft.requires_attestation());
        assert!(!Protocol::PoolBridge.requires_attestation());
        assert!(!Protocol::None.requires_attestation());
    }
}
