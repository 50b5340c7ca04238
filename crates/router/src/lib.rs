//! The on-ledger half of the stable router.
//!
//! The router keeps two owner-controlled registries, one of bridge endpoints per protocol and
//! chain and one of routes keyed by [`RouteKey`](stable_router_primitives::route::RouteKey), and
//! dispatches transfers along configured routes through a table of protocol adapters.
//!
//! The router never touches balances directly. Every effect goes through a [`Host`], which
//! provides token movements, calls into bridge endpoints, event emission and all-or-nothing
//! checkpoints. [`ledger::InMemoryLedger`] is a host backed by memory with mock bridge
//! endpoints, used to exercise the router and the relayer end to end.

pub mod adapters;
pub mod errors;
pub mod events;
pub mod host;
pub mod ledger;
pub mod registry;
pub mod router;

pub use errors::{RouterError, RouterResult};
pub use host::{Host, HostError};
pub use router::StableRouter;
