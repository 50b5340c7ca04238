//! This crate contains general types, traits and pure functions that need to be shared across
//! multiple crates.
//!
//! It lies at the bottom of the crate-hierarchy in this workspace i.e., it does not depend on any
//! other crate in this workspace. Both the on-ledger router model and the off-ledger relayer speak
//! in terms of the types defined here.

pub mod domains;
pub mod errors;
pub mod events;
pub mod message;
pub mod protocol;
pub mod route;
pub mod transfer;
pub mod types;

pub use alloy_primitives::{Address, Bytes, B256, U256};
