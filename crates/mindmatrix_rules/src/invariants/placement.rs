//! Placement invariants: units stay on the board and never share a cell.

use super::Invariant;
use crate::state::MatchState;
use std::collections::HashSet;

/// Invariant: every living unit stands on the board.
pub struct UnitsInBoundsInvariant;

impl Invariant<MatchState> for UnitsInBoundsInvariant {
    fn holds(state: &MatchState) -> bool {
        state
            .red
            .units
            .iter()
            .chain(state.blue.units.iter())
            .all(|u| u.position.in_bounds())
    }

    fn description() -> &'static str {
        "Every unit stands on the board"
    }
}

/// Invariant: no two living units, from either side, share a cell.
pub struct DistinctCellsInvariant;

impl Invariant<MatchState> for DistinctCellsInvariant {
    fn holds(state: &MatchState) -> bool {
        let mut seen = HashSet::new();
        state
            .red
            .units
            .iter()
            .chain(state.blue.units.iter())
            .all(|u| seen.insert(u.position))
    }

    fn description() -> &'static str {
        "No two units share a cell"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn test_opening_is_distinct() {
        assert!(DistinctCellsInvariant::holds(&MatchState::standard()));
    }

    #[test]
    fn test_shared_cell_across_sides_violates() {
        let mut state = MatchState::standard();
        state.red.unit_mut("R2").unwrap().position = Position::new(4, 4).unwrap();
        assert!(!DistinctCellsInvariant::holds(&state));
        assert!(UnitsInBoundsInvariant::holds(&state));
    }
}
