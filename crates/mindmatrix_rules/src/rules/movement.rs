//! Movement and harvesting.

use crate::action::ActionOutcome;
use crate::contracts::LegalMove;
use crate::state::MatchState;
use crate::types::Side;
use tracing::{debug, instrument};

/// Moves one of `side`'s units to `(x, y)` and harvests the destination.
///
/// Legal when the unit belongs to `side`, the target is on the board and
/// vacant, the Manhattan distance fits the unit's move budget, and the side
/// can pay two energy per cell. The cost is debited before harvesting.
#[instrument(skip(state), fields(turn = state.turn_number))]
pub fn apply_move(state: &mut MatchState, side: Side, unit_id: &str, x: i32, y: i32) -> ActionOutcome {
    let plan = match LegalMove::check(state, side, unit_id, x, y) {
        Ok(plan) => plan,
        Err(reason) => {
            debug!(%reason, "Move ignored");
            return ActionOutcome::Ignored(reason);
        }
    };

    let owner = state.side_mut(side);
    owner.resources.debit_energy(plan.cost);
    if let Some(unit) = owner.unit_mut(unit_id) {
        unit.position = plan.to;
    }

    if let Some(gain) = state.board.harvest(plan.to) {
        state.side_mut(side).resources.credit(gain);
    }

    debug!(to = %plan.to, cost = plan.cost, "Move applied");
    ActionOutcome::Applied
}
