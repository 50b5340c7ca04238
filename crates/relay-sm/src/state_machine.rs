//! Generic state machine infrastructure.
//!
//! This module provides the output type and the trait that the relay state machines implement.

/// Generic output from a state machine after processing an event.
///
/// The type parameter ensures that each state machine can only emit duties that are appropriate
/// for that state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMOutput<D> {
    /// The duties that need to be performed by external executors.
    pub duties: Vec<D>,
}

impl<D> Default for SMOutput<D> {
    fn default() -> Self {
        Self { duties: Vec::new() }
    }
}

impl<D> SMOutput<D> {
    /// Creates a new empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an output with the given duties.
    pub const fn with_duties(duties: Vec<D>) -> Self {
        Self { duties }
    }

    /// Creates an output with a single duty.
    pub fn with_duty(duty: D) -> Self {
        Self { duties: vec![duty] }
    }
}

/// Trait for all state machines in the relayer.
///
/// Each state machine implementation specifies its own config, duty, event and error types
/// through associated types.
pub trait StateMachine {
    /// Static configuration consulted during transitions.
    type Config;

    /// The type of duties this state machine can emit.
    type Duty;

    /// The type of events this state machine can process.
    type Event;

    /// The error type returned when event processing fails.
    type Error;

    /// Processes an event and returns the duties to execute, or an error.
    ///
    /// On error the state machine must be left exactly as it was before the call.
    fn process_event(
        &mut self,
        cfg: &Self::Config,
        event: Self::Event,
    ) -> Result<SMOutput<Self::Duty>, Self::Error>;
}
