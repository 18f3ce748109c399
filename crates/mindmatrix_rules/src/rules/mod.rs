//! Game rules for MindMatrix.
//!
//! Pure functions over a [`MatchState`](crate::MatchState). Each one either
//! applies its effect or leaves the state untouched; illegal actions are
//! never errors, only no-ops.

pub mod combat;
pub mod movement;
pub mod victory;

pub use combat::apply_attack;
pub use movement::apply_move;
pub use victory::check_victory;

use crate::action::{Action, ActionOutcome};
use crate::state::MatchState;
use crate::types::Side;

/// Dispatches one action to the matching rule.
pub fn apply_action(state: &mut MatchState, side: Side, action: &Action) -> ActionOutcome {
    match action {
        Action::Move { unit_id, x, y } => apply_move(state, side, unit_id, *x, *y),
        Action::Attack { unit_id, target_id } => apply_attack(state, side, unit_id, target_id),
    }
}
