//! Units owned by a side.

use crate::types::{Position, UnitKind};
use serde::{Deserialize, Serialize};

/// Identifier of a unit, unique within its side.
pub type UnitId = String;

/// A unit on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Identifier, unique within the owning side.
    pub id: UnitId,
    /// Archetype.
    pub kind: UnitKind,
    /// Current hit points. A unit at 0 is removed from play immediately.
    pub hp: u32,
    /// Hit point ceiling, fixed by kind.
    pub max_hp: u32,
    /// Current cell.
    pub position: Position,
}

impl Unit {
    /// Creates a unit at full health.
    pub fn new(id: impl Into<UnitId>, kind: UnitKind, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            hp: kind.max_hp(),
            max_hp: kind.max_hp(),
            position,
        }
    }

    /// Applies damage, clamping at zero. Returns `true` if the unit died.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        self.hp == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unit_at_full_health() {
        let unit = Unit::new("R1", UnitKind::Scout, Position::new(0, 0).unwrap());
        assert_eq!(unit.hp, 30);
        assert_eq!(unit.max_hp, 30);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut unit = Unit::new("M1", UnitKind::Mage, Position::new(2, 2).unwrap());
        assert!(!unit.take_damage(8));
        assert_eq!(unit.hp, 12);
        assert!(unit.take_damage(50));
        assert_eq!(unit.hp, 0);
    }
}
