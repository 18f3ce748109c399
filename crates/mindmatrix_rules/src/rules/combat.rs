//! Attacks and unit death.

use crate::action::ActionOutcome;
use crate::contracts::LegalAttack;
use crate::state::MatchState;
use crate::types::Side;
use tracing::{debug, info, instrument};

/// Has one of `side`'s units attack an enemy unit.
///
/// The target is looked up among the opponent's units only. A target whose
/// hit points reach zero is removed from its side at once.
#[instrument(skip(state), fields(turn = state.turn_number))]
pub fn apply_attack(
    state: &mut MatchState,
    side: Side,
    attacker_id: &str,
    target_id: &str,
) -> ActionOutcome {
    let plan = match LegalAttack::check(state, side, attacker_id, target_id) {
        Ok(plan) => plan,
        Err(reason) => {
            debug!(%reason, "Attack ignored");
            return ActionOutcome::Ignored(reason);
        }
    };

    let enemy = state.side_mut(side.opponent());
    let died = enemy
        .unit_mut(target_id)
        .is_some_and(|target| target.take_damage(plan.damage));

    if died {
        enemy.units.retain(|u| u.id != target_id);
        info!(target_id, "Unit destroyed");
    } else {
        debug!(damage = plan.damage, "Attack applied");
    }

    ActionOutcome::Applied
}
