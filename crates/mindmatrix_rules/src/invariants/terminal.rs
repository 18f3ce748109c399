//! Health and end-of-game invariants.

use super::Invariant;
use crate::state::MatchState;

/// Invariant: every living unit has `0 < hp <= max_hp`.
///
/// Units at zero hit points must already have been removed.
pub struct HealthInRangeInvariant;

impl Invariant<MatchState> for HealthInRangeInvariant {
    fn holds(state: &MatchState) -> bool {
        state
            .red
            .units
            .iter()
            .chain(state.blue.units.iter())
            .all(|u| u.hp > 0 && u.hp <= u.max_hp)
    }

    fn description() -> &'static str {
        "Living units have hit points in (0, max]"
    }
}

/// Invariant: a finished match names its winner.
pub struct TerminalHasWinnerInvariant;

impl Invariant<MatchState> for TerminalHasWinnerInvariant {
    fn holds(state: &MatchState) -> bool {
        !state.is_over || state.winner.is_some()
    }

    fn description() -> &'static str {
        "A finished match has a winner"
    }
}
