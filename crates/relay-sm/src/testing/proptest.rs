//! Property-based testing macros for state machines.
//!
//! Each macro expands to a proptest block that checks one invariant over arbitrary machines and
//! events. The machine is built from a generated input with `$create_fn` and observed through
//! `$get_state_fn`, so the observed state need not be the same type as the generated input.

/// Property: processing the same event on two identical machines yields identical results.
///
/// # Arguments
/// * `$create_fn` - Function to create the SM from a generated input
/// * `$get_state_fn` - Function to observe the SM: `Fn(&SM) -> &State`
/// * `$config` - Configuration to pass to `process_event`
/// * `$input_strategy` - Proptest strategy for generating inputs
/// * `$event_strategy` - Proptest strategy for generating events
#[macro_export]
macro_rules! prop_deterministic {
    ($create_fn:expr, $get_state_fn:expr, $config:expr, $input_strategy:expr, $event_strategy:expr) => {
        proptest::proptest! {
            #[test]
            fn state_machine_is_deterministic(
                input in $input_strategy,
                event in $event_strategy,
            ) {
                use $crate::state_machine::StateMachine;

                let mut sm1 = $create_fn(input.clone());
                let mut sm2 = $create_fn(input);

                let result1 = sm1.process_event($config, event.clone());
                let result2 = sm2.process_event($config, event);

                match (result1, result2) {
                    (Ok(out1), Ok(out2)) => {
                        proptest::prop_assert_eq!($get_state_fn(&sm1), $get_state_fn(&sm2));
                        proptest::prop_assert_eq!(out1.duties, out2.duties);
                    }
                    (Err(e1), Err(e2)) => {
                        proptest::prop_assert_eq!(e1, e2);
                    }
                    _ => {
                        proptest::prop_assert!(false, "Inconsistent results: one succeeded, one failed");
                    }
                }
            }
        }
    };
}

/// Property: machines in a terminal state reject every event from the pipeline.
///
/// # Arguments
/// * `$create_fn` - Function to create the SM from a generated input
/// * `$config` - Configuration to pass to `process_event`
/// * `$terminal_inputs` - Proptest strategy for generating inputs in a terminal state
/// * `$event_strategy` - Proptest strategy for generating events
#[macro_export]
macro_rules! prop_terminal_states_reject {
    ($create_fn:expr, $config:expr, $terminal_inputs:expr, $event_strategy:expr) => {
        proptest::proptest! {
            #[test]
            fn terminal_states_reject_pipeline_events(
                terminal in $terminal_inputs,
                event in $event_strategy,
            ) {
                use $crate::state_machine::StateMachine;

                let mut sm = $create_fn(terminal);
                let result = sm.process_event($config, event);

                proptest::prop_assert!(
                    result.is_err(),
                    "Terminal states should return error, got: {:?}",
                    result
                );
            }
        }
    };
}

/// Property: events either change the observed state, emit duties, or fail without side effects.
///
/// # Arguments
/// * `$create_fn` - Function to create the SM from a generated input
/// * `$get_state_fn` - Function to observe the SM: `Fn(&SM) -> &State`
/// * `$config` - Configuration to pass to `process_event`
/// * `$input_strategy` - Proptest strategy for generating inputs
/// * `$event_strategy` - Proptest strategy for generating events
#[macro_export]
macro_rules! prop_no_silent_acceptance {
    ($create_fn:expr, $get_state_fn:expr, $config:expr, $input_strategy:expr, $event_strategy:expr) => {
        proptest::proptest! {
            #[test]
            fn events_transition_or_error(
                input in $input_strategy,
                event in $event_strategy,
            ) {
                use $crate::state_machine::StateMachine;

                let mut sm = $create_fn(input);
                let initial_state = $get_state_fn(&sm).clone();
                let initial_sm = sm.clone();

                let result = sm.process_event($config, event);
                let final_state = $get_state_fn(&sm).clone();

                match result {
                    Ok(output) => {
                        let state_changed = initial_state != final_state;
                        let has_output = !output.duties.is_empty();

                        proptest::prop_assert!(
                            state_changed || has_output,
                            "Event was accepted but nothing happened (no state change or duties)"
                        );
                    }
                    Err(_) => {
                        proptest::prop_assert_eq!(
                            &initial_sm,
                            &sm,
                            "Machine changed despite error"
                        );
                    }
                }
            }
        }
    };
}
