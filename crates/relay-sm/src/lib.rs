//! This crate implements the state machine that drives a bridged message from the moment its
//! dispatch is observed until it is received on the destination chain.
//!
//! The state machine is pure: it consumes events describing what happened (a poll came back
//! empty, a submission reverted, an operator cancelled the transfer, ...) and emits duties that
//! the relayer must execute to make further progress. Persisting the resulting record is left to
//! the caller, which is expected to do so with a compare-and-swap on the record's prior state and
//! version.

pub mod config;
pub mod duties;
pub mod errors;
pub mod events;
pub mod machine;
pub mod state_machine;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
