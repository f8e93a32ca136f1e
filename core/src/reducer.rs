//! The reducer abstraction.
//!
//! A reducer is a pure function `(State, Action, Environment) -> Output`. It
//! validates the action, updates state in place and reports what happened.
//! Reducers never perform I/O; the runtime owns the state, serializes access
//! to it, and does the logging and metrics that follow a reduction.

/// Core reducer trait
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// What a reduction reports back to the caller
    type Output;

    /// Reduce an action into state changes
    ///
    /// # Arguments
    ///
    /// - `state`: Mutable reference to current state
    /// - `action`: The action to process
    /// - `env`: Reference to injected dependencies
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Self::Output;
}
