//! Codec for burn/mint protocol messages.
//!
//! A message is a fixed 116-byte header followed by a message body. For token transfers the body
//! is a burn message which may be followed by hook data:
//!
//! ```text
//! header: version(4) | source_domain(4) | dest_domain(4) | nonce(8) | sender(32) |
//!         recipient(32) | destination_caller(32)
//! body:   version(4) | burn_token(32) | mint_recipient(32) | amount(32) | message_sender(32) |
//!         hook_data(..)
//! ```
//!
//! All integers are big-endian. The [`MessageId`] of a message is the keccak256 hash of its
//! encoding.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};

use crate::{
    errors::MessageError,
    types::{Domain, MessageId},
};

/// Length of the message header.
pub const MESSAGE_HEADER_LEN: usize = 116;

/// Length of the fixed part of the burn message body.
pub const BURN_BODY_LEN: usize = 132;

/// A decoded burn/mint message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnMessage {
    /// Message format version.
    pub version: u32,

    /// Domain of the source chain.
    pub source_domain: Domain,

    /// Domain of the destination chain.
    pub dest_domain: Domain,

    /// Nonce assigned by the source messenger. Unique per source domain.
    pub nonce: u64,

    /// Contract that sent the message on the source chain.
    pub sender: B256,

    /// Contract that handles the message on the destination chain.
    pub recipient: B256,

    /// The only caller allowed to relay the message, or zero if anyone may.
    pub destination_caller: B256,

    /// The burn body.
    pub body: BurnBody,
}

/// The body of a burn message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnBody {
    /// Body format version.
    pub version: u32,

    /// Token burnt on the source chain.
    pub burn_token: B256,

    /// Account credited on the destination chain.
    pub mint_recipient: B256,

    /// Amount burnt.
    pub amount: U256,

    /// Account that initiated the burn.
    pub message_sender: B256,

    /// Hook payload executed by the destination receiver, empty when no hook is attached.
    pub hook_data: Bytes,
}

impl BurnMessage {
    /// Decodes a message from its wire encoding.
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        let expected = MESSAGE_HEADER_LEN + BURN_BODY_LEN;
        if bytes.len() < expected {
            return Err(MessageError::TooShort {
                expected,
                actual: bytes.len(),
            });
        }

        let body = &bytes[MESSAGE_HEADER_LEN..];

        Ok(Self {
            version: read_u32(bytes, 0),
            source_domain: read_u32(bytes, 4),
            dest_domain: read_u32(bytes, 8),
            nonce: read_u64(bytes, 12),
            sender: B256::from_slice(&bytes[20..52]),
            recipient: B256::from_slice(&bytes[52..84]),
            destination_caller: B256::from_slice(&bytes[84..116]),
            body: BurnBody {
                version: read_u32(body, 0),
                burn_token: B256::from_slice(&body[4..36]),
                mint_recipient: B256::from_slice(&body[36..68]),
                amount: U256::from_be_slice(&body[68..100]),
                message_sender: B256::from_slice(&body[100..132]),
                hook_data: Bytes::copy_from_slice(&body[BURN_BODY_LEN..]),
            },
        })
    }

    /// Encodes the message into its wire format.
    pub fn encode(&self) -> Bytes {
        let mut out =
            Vec::with_capacity(MESSAGE_HEADER_LEN + BURN_BODY_LEN + self.body.hook_data.len());

        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&self.source_domain.to_be_bytes());
        out.extend_from_slice(&self.dest_domain.to_be_bytes());
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(self.sender.as_slice());
        out.extend_from_slice(self.recipient.as_slice());
        out.extend_from_slice(self.destination_caller.as_slice());

        out.extend_from_slice(&self.body.version.to_be_bytes());
        out.extend_from_slice(self.body.burn_token.as_slice());
        out.extend_from_slice(self.body.mint_recipient.as_slice());
        out.extend_from_slice(&self.body.amount.to_be_bytes::<32>());
        out.extend_from_slice(self.body.message_sender.as_slice());
        out.extend_from_slice(&self.body.hook_data);

        out.into()
    }

    /// Computes the identifier of this message.
    pub fn message_id(&self) -> MessageId {
        message_id_of(&self.encode())
    }

    /// The account credited on the destination chain, narrowed back to an address.
    pub fn mint_recipient_address(&self) -> Address {
        Address::from_word(self.body.mint_recipient)
    }
}

/// Computes the [`MessageId`] of an encoded message.
pub fn message_id_of(message: &[u8]) -> MessageId {
    MessageId::new(keccak256(message))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_be_bytes(buf)
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_be_bytes(buf)
}
