//! Shared contract for lifecycle enums.
//!
//! The follow-up queue and the conversation phase both implement this trait
//! so every transition goes through the same validation.

use super::ValidationError;

/// A closed set of states with an explicit transition table.
///
/// ```ignore
/// impl StateMachine for DepthState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         self.valid_transitions().contains(target)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Scanning => vec![Queued, Resolved],
///             // ...
///         }
///     }
/// }
///
/// let next = state.transition_to(DepthState::Queued)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from `self` to `target` is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// All states reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Validated transition.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// True when no outgoing transition exists.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
