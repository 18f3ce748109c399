//! Victory evaluation.

use crate::state::MatchState;
use crate::types::Side;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Energy required for a resource victory.
pub const ENERGY_THRESHOLD: u32 = 100;

/// Mind required for a resource victory.
pub const MIND_THRESHOLD: u32 = 50;

/// Which condition ended the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VictoryCondition {
    /// The loser has no units left.
    Annihilation,
    /// The winner stands on the loser's home cell unopposed.
    BaseOccupation,
    /// The winner reached both resource thresholds.
    ResourceThreshold,
}

/// A decided game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    /// Winning side.
    pub winner: Side,
    /// How it was won.
    pub condition: VictoryCondition,
}

impl Victory {
    fn new(winner: Side, condition: VictoryCondition) -> Self {
        Self { winner, condition }
    }
}

/// Evaluates the victory conditions in priority order; the first match wins.
///
/// 1. Annihilation. If both sides are empty at once this check yields no
///    winner and evaluation falls through.
/// 2. Base occupation. Mutual occupation cancels for both sides.
/// 3. Resource threshold, red checked before blue.
#[instrument(skip(state), fields(turn = state.turn_number))]
pub fn check_victory(state: &MatchState) -> Option<Victory> {
    annihilation(state)
        .or_else(|| base_occupation(state))
        .or_else(|| resource_threshold(state))
        .map(|(winner, condition)| Victory::new(winner, condition))
}

fn annihilation(state: &MatchState) -> Option<(Side, VictoryCondition)> {
    let red_gone = state.red.units.is_empty();
    let blue_gone = state.blue.units.is_empty();
    match (red_gone, blue_gone) {
        (true, false) => Some((Side::Blue, VictoryCondition::Annihilation)),
        (false, true) => Some((Side::Red, VictoryCondition::Annihilation)),
        // Double annihilation has no winner under this condition.
        _ => None,
    }
}

fn base_occupation(state: &MatchState) -> Option<(Side, VictoryCondition)> {
    Side::iter()
        .find(|&side| {
            let raiding = state.side(side).occupies(side.opponent().home());
            let raided = state.side(side.opponent()).occupies(side.home());
            raiding && !raided
        })
        .map(|side| (side, VictoryCondition::BaseOccupation))
}

fn resource_threshold(state: &MatchState) -> Option<(Side, VictoryCondition)> {
    Side::iter()
        .find(|&side| {
            let resources = state.side(side).resources;
            resources.energy >= ENERGY_THRESHOLD && resources.mind >= MIND_THRESHOLD
        })
        .map(|side| (side, VictoryCondition::ResourceThreshold))
}
