//! Testing utilities for the transfer state machine.
//!
//! - [`transition`]: value-based transition checks and event sequences
//! - [`proptest`]: property-based testing macros
//! - [`fixtures`]: records, events and strategies

pub(crate) mod fixtures;
pub(crate) mod proptest;
pub(crate) mod transition;

pub(crate) use transition::{
    test_transfer_invalid_transition, test_transfer_transition, EventSequence,
    TransferInvalidTransition, TransferTransition,
};
