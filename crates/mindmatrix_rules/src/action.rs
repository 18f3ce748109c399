//! First-class action types.
//!
//! Actions are a side's intent for one unit. They reference units by id and
//! carry raw coordinates; nothing about them is trusted until the rules
//! engine re-validates them against the state they are applied to.

use crate::types::Side;
use crate::unit::UnitId;
use serde::{Deserialize, Serialize};

/// A single unit action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Move a unit to a target cell, harvesting whatever is there.
    Move {
        /// Unit to move.
        #[serde(rename = "unitId")]
        unit_id: UnitId,
        /// Target column. Signed so off-board targets survive decoding.
        x: i32,
        /// Target row.
        y: i32,
    },
    /// Attack an enemy unit.
    Attack {
        /// Attacking unit.
        #[serde(rename = "unitId")]
        unit_id: UnitId,
        /// Enemy unit to hit.
        #[serde(rename = "targetId")]
        target_id: UnitId,
    },
}

impl Action {
    /// Creates a move action.
    pub fn move_to(unit_id: impl Into<UnitId>, x: i32, y: i32) -> Self {
        Action::Move {
            unit_id: unit_id.into(),
            x,
            y,
        }
    }

    /// Creates an attack action.
    pub fn attack(unit_id: impl Into<UnitId>, target_id: impl Into<UnitId>) -> Self {
        Action::Attack {
            unit_id: unit_id.into(),
            target_id: target_id.into(),
        }
    }

    /// The acting unit.
    pub fn unit_id(&self) -> &str {
        match self {
            Action::Move { unit_id, .. } | Action::Attack { unit_id, .. } => unit_id,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { unit_id, x, y } => write!(f, "{unit_id} -> ({x}, {y})"),
            Action::Attack { unit_id, target_id } => write!(f, "{unit_id} attacks {target_id}"),
        }
    }
}

/// The ordered actions one side submits for one turn.
pub type ActionBatch = Vec<Action>;

/// Why the rules engine declined to apply an action.
///
/// These never reach the submitting side; they exist for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum IgnoreReason {
    /// The acting unit is not (or no longer) one of the side's units.
    #[display("{} has no unit {}", _0, _1)]
    UnknownUnit(Side, UnitId),

    /// The target unit is not one of the opposing side's units.
    #[display("{} has no unit {}", _0, _1)]
    UnknownTarget(Side, UnitId),

    /// The target cell is off the board.
    #[display("({}, {}) is off the board", _0, _1)]
    OutOfBounds(i32, i32),

    /// Another unit already stands on the target cell.
    #[display("target cell is occupied by {}", _0)]
    Occupied(UnitId),

    /// The distance exceeds the unit's move budget or attack range.
    #[display("distance {} exceeds limit {}", distance, limit)]
    TooFar {
        /// Manhattan distance requested.
        distance: u32,
        /// Budget or range of the unit.
        limit: u32,
    },

    /// The side cannot pay the energy cost.
    #[display("needs {} energy, has {}", cost, available)]
    InsufficientEnergy {
        /// Energy required.
        cost: u32,
        /// Energy held.
        available: u32,
    },
}

impl std::error::Error for IgnoreReason {}

/// Result of handing one action to the rules engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action changed the state.
    Applied,
    /// The action was a no-op.
    Ignored(IgnoreReason),
}

impl ActionOutcome {
    /// Whether the action took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

impl From<Result<(), IgnoreReason>> for ActionOutcome {
    fn from(result: Result<(), IgnoreReason>) -> Self {
        match result {
            Ok(()) => ActionOutcome::Applied,
            Err(reason) => ActionOutcome::Ignored(reason),
        }
    }
}
