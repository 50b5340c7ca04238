//! The off-ledger half of the stable router: a relayer that completes burn/mint transfers.
//!
//! A transfer enters the relayer when its dispatch event is observed. From then on a worker polls
//! the attestation service until the message is attested, submits the attested message to the
//! destination chain and records the outcome. Every step is a transition of the
//! [`TransferSM`](relay_sm::machine::TransferSM) that is committed with a compare-and-swap on the
//! [`TransferStore`](stable_router_db::TransferStore), so any number of workers (and operators)
//! can act on the same record without ever applying a transition twice.

pub mod attestation;
pub mod backoff;
pub mod clock;
pub mod destination;
pub mod errors;
pub mod gateway;
pub mod iris;
pub mod observer;
pub mod operator;
pub mod poller;
pub mod relayer;
pub mod scheduler;
pub mod submitter;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(test)]
mod tests;

pub use errors::{RelayerError, RelayerResult};
pub use relayer::Relayer;
pub use scheduler::{Scheduler, SchedulerHandle};
