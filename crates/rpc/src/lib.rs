//! Provides the RPC interface of the attestation relayer.
//!
//! The relayer exposes a control API, a monitoring API over the tracked transfers and an operator
//! API that feeds observed dispatch events and lets an operator cancel or resubmit transfers. The
//! destination gateway API is implemented by an external signing gateway and consumed by the
//! relayer's submitter.

pub mod traits;
pub mod types;
