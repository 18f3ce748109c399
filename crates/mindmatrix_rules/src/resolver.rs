//! Turn resolution.
//!
//! Red's batch is applied in full, in submission order, before any of
//! blue's actions. The asymmetry is the tie-break for same-turn conflicts:
//! a cell red moves into is occupied by the time blue moves, and a unit red
//! kills cannot act for blue.

use crate::action::{Action, ActionOutcome};
use crate::invariants::{InvariantSet, MatchInvariants};
use crate::rules::{apply_action, check_victory, victory::Victory};
use crate::state::MatchState;
use crate::types::{Resources, Side};
use tracing::{debug, info, instrument, warn};

/// Resources every side gains at the end of a turn that does not end the game.
pub const TURN_INCOME: Resources = Resources { energy: 5, mind: 2 };

/// Outcome of resolving one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// State after the turn.
    pub state: MatchState,
    /// Set when the turn ended the game.
    pub victory: Option<Victory>,
    /// Per-action outcome of red's batch, in order.
    pub red_outcomes: Vec<ActionOutcome>,
    /// Per-action outcome of blue's batch, in order.
    pub blue_outcomes: Vec<ActionOutcome>,
}

/// Resolves one turn from a state snapshot and both batches.
///
/// Pure: the input state is not touched, and the same inputs always produce
/// the same resolution. A resolution that ends the game leaves the turn
/// counter, turn side and resources where the actions left them; otherwise
/// the turn advances and both sides collect [`TURN_INCOME`]. Pending
/// batches are cleared either way.
#[instrument(skip_all, fields(turn = state.turn_number, red_actions = red.len(), blue_actions = blue.len()))]
pub fn resolve_turn(state: &MatchState, red: &[Action], blue: &[Action]) -> Resolution {
    let mut next = state.clone();

    let red_outcomes = apply_batch(&mut next, Side::Red, red);
    let blue_outcomes = apply_batch(&mut next, Side::Blue, blue);

    next.red.pending = None;
    next.blue.pending = None;

    let victory = check_victory(&next);
    match victory {
        Some(victory) => {
            info!(winner = %victory.winner, condition = %victory.condition, "Match decided");
            next.winner = Some(victory.winner);
            next.is_over = true;
        }
        None => {
            next.turn_number += 1;
            next.current_turn_side = next.current_turn_side.opponent();
            next.red.resources.credit(TURN_INCOME);
            next.blue.resources.credit(TURN_INCOME);
            debug!(next_turn = next.turn_number, "Turn advanced");
        }
    }

    let checked = MatchInvariants::check_all(&next);
    if let Err(violations) = &checked {
        warn!(?violations, "Invariant violated after resolution");
    }
    debug_assert!(checked.is_ok(), "Invariant violated after resolution");

    Resolution {
        state: next,
        victory,
        red_outcomes,
        blue_outcomes,
    }
}

fn apply_batch(state: &mut MatchState, side: Side, batch: &[Action]) -> Vec<ActionOutcome> {
    batch
        .iter()
        .map(|action| {
            let outcome = apply_action(state, side, action);
            debug!(%side, %action, applied = outcome.is_applied(), "Action resolved");
            outcome
        })
        .collect()
}
