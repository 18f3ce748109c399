//! Preconditions for unit actions.
//!
//! Each precondition is a small, independently testable check. The rules
//! engine composes them into [`LegalMove`] and [`LegalAttack`]; a failed
//! check becomes the [`IgnoreReason`] of a no-op.

use crate::action::IgnoreReason;
use crate::state::MatchState;
use crate::types::{Position, Resources, Side};
use crate::unit::Unit;
use tracing::instrument;

/// Energy spent per cell of movement.
pub const ENERGY_PER_STEP: u32 = 2;

// ─────────────────────────────────────────────────────────────
//  Atomic preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the unit exists among `side`'s living units.
pub struct UnitOwned;

impl UnitOwned {
    /// Returns the unit on success.
    pub fn check<'a>(state: &'a MatchState, side: Side, id: &str) -> Result<&'a Unit, IgnoreReason> {
        state
            .side(side)
            .unit(id)
            .ok_or_else(|| IgnoreReason::UnknownUnit(side, id.to_string()))
    }
}

/// Precondition: the target is one of the opponent's living units.
///
/// The target's side is always the attacker's opponent; ids are never
/// parsed for ownership.
pub struct EnemyTarget;

impl EnemyTarget {
    /// Returns the target on success.
    pub fn check<'a>(
        state: &'a MatchState,
        attacker_side: Side,
        id: &str,
    ) -> Result<&'a Unit, IgnoreReason> {
        let enemy = attacker_side.opponent();
        state
            .side(enemy)
            .unit(id)
            .ok_or_else(|| IgnoreReason::UnknownTarget(enemy, id.to_string()))
    }
}

/// Precondition: the coordinates name a cell on the board.
pub struct OnBoard;

impl OnBoard {
    /// Returns the validated position.
    pub fn check(x: i32, y: i32) -> Result<Position, IgnoreReason> {
        Position::new(x, y).ok_or(IgnoreReason::OutOfBounds(x, y))
    }
}

/// Precondition: no unit of either side stands on the cell.
pub struct CellVacant;

impl CellVacant {
    /// Checks the cell against every living unit.
    pub fn check(state: &MatchState, pos: Position) -> Result<(), IgnoreReason> {
        match state.unit_at(pos) {
            Some(unit) => Err(IgnoreReason::Occupied(unit.id.clone())),
            None => Ok(()),
        }
    }
}

/// Precondition: a distance fits within a limit.
pub struct WithinReach;

impl WithinReach {
    /// Checks `distance <= limit`.
    pub fn check(distance: u32, limit: u32) -> Result<(), IgnoreReason> {
        if distance > limit {
            Err(IgnoreReason::TooFar { distance, limit })
        } else {
            Ok(())
        }
    }
}

/// Precondition: the side holds enough energy.
pub struct CanAfford;

impl CanAfford {
    /// Checks `resources.energy >= cost`.
    pub fn check(resources: &Resources, cost: u32) -> Result<(), IgnoreReason> {
        if resources.energy < cost {
            Err(IgnoreReason::InsufficientEnergy {
                cost,
                available: resources.energy,
            })
        } else {
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Composite preconditions
// ─────────────────────────────────────────────────────────────

/// A validated move, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    /// Destination cell.
    pub to: Position,
    /// Manhattan distance travelled.
    pub distance: u32,
    /// Energy to debit.
    pub cost: u32,
}

/// Composite precondition for moves.
pub struct LegalMove;

impl LegalMove {
    /// Validates every move precondition, in the order the rules list them.
    #[instrument(skip(state))]
    pub fn check(
        state: &MatchState,
        side: Side,
        unit_id: &str,
        x: i32,
        y: i32,
    ) -> Result<MovePlan, IgnoreReason> {
        let unit = UnitOwned::check(state, side, unit_id)?;
        let to = OnBoard::check(x, y)?;
        CellVacant::check(state, to)?;
        let distance = unit.position.distance(to);
        WithinReach::check(distance, unit.kind.move_budget())?;
        let cost = distance * ENERGY_PER_STEP;
        CanAfford::check(&state.side(side).resources, cost)?;
        Ok(MovePlan { to, distance, cost })
    }
}

/// A validated attack, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackPlan {
    /// Hit points to remove from the target.
    pub damage: u32,
}

/// Composite precondition for attacks.
pub struct LegalAttack;

impl LegalAttack {
    /// Validates every attack precondition.
    #[instrument(skip(state))]
    pub fn check(
        state: &MatchState,
        side: Side,
        attacker_id: &str,
        target_id: &str,
    ) -> Result<AttackPlan, IgnoreReason> {
        let attacker = UnitOwned::check(state, side, attacker_id)?;
        let target = EnemyTarget::check(state, side, target_id)?;
        let distance = attacker.position.distance(target.position);
        WithinReach::check(distance, attacker.kind.attack_range())?;
        Ok(AttackPlan {
            damage: attacker.kind.damage(),
        })
    }
}
