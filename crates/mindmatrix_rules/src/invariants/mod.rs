//! First-class invariants for match state.
//!
//! Invariants are logical properties that must hold after every resolution.
//! They are checked in debug builds and can be tested independently.

mod placement;
mod terminal;

pub use placement::{DistinctCellsInvariant, UnitsInBoundsInvariant};
pub use terminal::{HealthInRangeInvariant, TerminalHasWinnerInvariant};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
            (I4::holds(state), I4::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

/// All match-state invariants as a composable set.
pub type MatchInvariants = (
    UnitsInBoundsInvariant,
    DistinctCellsInvariant,
    HealthInRangeInvariant,
    TerminalHasWinnerInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MatchState;
    use crate::types::Position;

    #[test]
    fn test_invariant_set_holds_for_opening() {
        assert!(MatchInvariants::check_all(&MatchState::standard()).is_ok());
    }

    #[test]
    fn test_invariant_set_reports_every_violation() {
        let mut state = MatchState::standard();
        // Stack B1 on R1 and end the game without a winner.
        state.blue.unit_mut("B1").unwrap().position = Position::new(0, 0).unwrap();
        state.is_over = true;

        let violations = MatchInvariants::check_all(&state).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        type Placement = (UnitsInBoundsInvariant, DistinctCellsInvariant);
        assert!(Placement::check_all(&MatchState::standard()).is_ok());
    }
}
