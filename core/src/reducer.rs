//! The reducer seam.
//!
//! Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
//! They hold the business rules; a runtime owns I/O and executes the effects.

use smallvec::SmallVec;

/// Core abstraction for business logic
///
/// # Type Parameters
///
/// - `State`: The domain state this reducer operates on
/// - `Action`: The action type this reducer processes
/// - `Environment`: The injected dependencies this reducer needs
/// - `Effect`: Descriptions of the work the runtime performs afterwards
///
/// # Example
///
/// ```ignore
/// impl Reducer for BookingReducer {
///     type State = BookingState;
///     type Action = BookingAction;
///     type Environment = BookingEnvironment;
///     type Effect = BookingEffect;
///
///     fn reduce(&self, state: &mut BookingState, action: BookingAction, env: &BookingEnvironment)
///         -> SmallVec<[BookingEffect; 4]> { /* ... */ }
/// }
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// The effect descriptions this reducer emits
    type Effect;

    /// Reduce an action into state changes and effects
    ///
    /// This is a pure function that:
    /// 1. Validates the action
    /// 2. Updates state in place
    /// 3. Returns effect descriptions to be executed, in order
    ///
    /// A rejected action leaves the state untouched apart from its error
    /// slot and returns no effects.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Self::Effect; 4]>;
}
