//! Scalar and identifier types shared across the workspace.

use std::{fmt, str::FromStr, time::Duration};

use alloy_primitives::{hex, B256};
use serde::{Deserialize, Serialize};

/// The native chain id of a ledger (EIP-155 style).
pub type ChainId = u64;

/// A bridge protocol's own numeric identifier for a chain.
///
/// This is distinct from the [`ChainId`]; e.g., the burn/mint protocol calls Arbitrum `3` while
/// its chain id is `42161`.
pub type Domain = u32;

/// Milliseconds since the unix epoch.
pub type Timestamp = u64;

/// The length of `duration` in milliseconds, saturating at [`Timestamp::MAX`].
pub fn duration_millis(duration: Duration) -> Timestamp {
    Timestamp::try_from(duration.as_millis()).unwrap_or(Timestamp::MAX)
}

/// The protocol-assigned identifier of a cross-chain message.
///
/// For burn/mint messages this is the hash of the emitted message bytes; for the omnichain
/// protocol it is the message guid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(B256);

impl MessageId {
    /// Creates a new [`MessageId`] from a 32-byte word.
    pub const fn new(inner: B256) -> Self {
        Self(inner)
    }

    /// Returns the underlying 32-byte word.
    pub const fn as_b256(&self) -> &B256 {
        &self.0
    }

    /// Returns the raw bytes of the identifier.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<B256> for MessageId {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<MessageId> for B256 {
    fn from(value: MessageId) -> Self {
        value.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_prefixed(self.0))
    }
}

impl FromStr for MessageId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s).map(Self)
    }
}
