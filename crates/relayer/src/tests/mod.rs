//! Behavior of the relayer against mock attestation services and destination chains.
//!
//! Time-dependent tests run on paused tokio time, so timeouts of an hour complete instantly.

mod operator;
