//! This crate contains the parameters that dictate the timing behavior of the attestation relayer.
//!
//! All values have defaults so that a parameters file only needs to list the values it overrides.

mod default;
pub mod errors;
pub mod relayer;

pub use errors::ParamsError;
pub use relayer::{AttestationParams, RelayerParams, SubmissionParams, WorkerParams};
