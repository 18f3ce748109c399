//! Fallback batches for sides that miss the turn deadline.

use mindmatrix_rules::{Action, ActionBatch, BOARD_SIZE, MatchState, Side};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const STEPS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// How the turn timer fills in for a side that did not submit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FallbackStrategy {
    /// Submit an empty batch.
    Idle,
    /// Each unit has an even chance of stepping one cell in a random
    /// cardinal direction, clamped to the board.
    #[default]
    Wander,
}

/// Produces fallback batches for one session.
#[derive(Debug, Clone)]
pub struct FallbackPlanner {
    strategy: FallbackStrategy,
    rng: StdRng,
}

impl FallbackPlanner {
    /// Creates a planner. A seed makes the wander strategy reproducible.
    pub fn new(strategy: FallbackStrategy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { strategy, rng }
    }

    /// Configured strategy.
    pub fn strategy(&self) -> FallbackStrategy {
        self.strategy
    }

    /// Synthesizes a batch for `side`.
    ///
    /// The batch is not checked for legality here; it goes through the rules
    /// engine like any submitted batch.
    #[instrument(skip(self, state), fields(strategy = %self.strategy))]
    pub fn plan(&mut self, state: &MatchState, side: Side) -> ActionBatch {
        let batch = match self.strategy {
            FallbackStrategy::Idle => Vec::new(),
            FallbackStrategy::Wander => self.wander(state, side),
        };
        debug!(actions = batch.len(), "Fallback batch planned");
        batch
    }

    fn wander(&mut self, state: &MatchState, side: Side) -> ActionBatch {
        let edge = i32::from(BOARD_SIZE) - 1;
        let mut batch = Vec::new();
        for unit in &state.side(side).units {
            if !self.rng.random_bool(0.5) {
                continue;
            }
            let Some(&(dx, dy)) = STEPS.choose(&mut self.rng) else {
                continue;
            };
            let x = (i32::from(unit.position.x()) + dx).clamp(0, edge);
            let y = (i32::from(unit.position.y()) + dy).clamp(0, edge);
            batch.push(Action::move_to(unit.id.clone(), x, y));
        }
        batch
    }
}
