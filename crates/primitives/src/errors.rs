//! Errors for the primitive types.

use thiserror::Error;

/// Error while decoding a burn/mint message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The message is shorter than the fixed-size layout requires.
    #[error("message too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// The minimum length required.
        expected: usize,
        /// The length of the supplied message.
        actual: usize,
    },
}

/// Error while converting raw values into typed primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The protocol discriminant does not correspond to a known protocol.
    #[error("unknown protocol id: {0}")]
    UnknownProtocol(u8),

    /// The transfer state name is not recognized.
    #[error("unknown transfer state: {0}")]
    UnknownState(String),
}
