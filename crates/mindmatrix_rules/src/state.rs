//! Complete match state.

use crate::action::ActionBatch;
use crate::board::Board;
use crate::types::{Position, Resources, Side, UnitKind};
use crate::unit::Unit;
use serde::{Deserialize, Serialize};

/// Everything one side owns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideState {
    /// Living units. Order carries no meaning.
    pub units: Vec<Unit>,
    /// Stockpile.
    pub resources: Resources,
    /// Batch submitted for the current turn; `None` until the side submits.
    /// Not serialized: a batch stays private to its side until resolution.
    #[serde(skip)]
    pub pending: Option<ActionBatch>,
}

impl SideState {
    /// Creates a side with the given units and resources and nothing pending.
    pub fn new(units: Vec<Unit>, resources: Resources) -> Self {
        Self {
            units,
            resources,
            pending: None,
        }
    }

    /// Looks up a unit by id.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Looks up a unit by id for mutation.
    pub fn unit_mut(&mut self, id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Whether any of this side's units stands on `pos`.
    pub fn occupies(&self, pos: Position) -> bool {
        self.units.iter().any(|u| u.position == pos)
    }
}

/// Full state of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// Starts at 1 and increments on every resolution that does not end the game.
    pub turn_number: u32,
    /// Alternates every resolved turn. Informational; both sides submit each turn.
    pub current_turn_side: Side,
    /// Board and deposits.
    pub board: Board,
    /// Red side.
    pub red: SideState,
    /// Blue side.
    pub blue: SideState,
    /// Set exactly when the game ends.
    pub winner: Option<Side>,
    /// Once true, stays true.
    pub is_over: bool,
}

impl MatchState {
    /// Creates a match from explicit parts, starting at turn 1 with red to act.
    pub fn with_sides(board: Board, red: SideState, blue: SideState) -> Self {
        Self {
            turn_number: 1,
            current_turn_side: Side::Red,
            board,
            red,
            blue,
            winner: None,
            is_over: false,
        }
    }

    /// Creates the standard opening position.
    pub fn standard() -> Self {
        let at = |x, y| Position::new(x, y).unwrap_or(Side::Red.home());
        let opening = Resources::new(50, 30);

        let red = SideState::new(
            vec![
                Unit::new("R1", UnitKind::Scout, at(0, 0)),
                Unit::new("R2", UnitKind::Warrior, at(4, 0)),
            ],
            opening,
        );
        let blue = SideState::new(
            vec![
                Unit::new("B1", UnitKind::Warrior, at(0, 4)),
                Unit::new("B2", UnitKind::Scout, at(4, 4)),
            ],
            opening,
        );

        Self::with_sides(Board::standard(), red, blue)
    }

    /// Returns one side's state.
    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    /// Returns one side's state for mutation.
    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        }
    }

    /// Returns the unit standing on `pos`, from either side.
    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.red
            .units
            .iter()
            .chain(self.blue.units.iter())
            .find(|u| u.position == pos)
    }

    /// Total living units on both sides.
    pub fn unit_count(&self) -> usize {
        self.red.units.len() + self.blue.units.len()
    }

    /// Whether both sides have a non-empty batch pending.
    pub fn both_submitted(&self) -> bool {
        let ready = |side: &SideState| side.pending.as_ref().is_some_and(|b| !b.is_empty());
        ready(&self.red) && ready(&self.blue)
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_opening() {
        let state = MatchState::standard();
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.current_turn_side, Side::Red);
        assert_eq!(state.red.resources, Resources::new(50, 30));
        assert_eq!(state.unit_count(), 4);
        assert_eq!(state.red.unit("R1").unwrap().position, Side::Red.home());
        assert_eq!(state.blue.unit("B1").unwrap().position, Side::Blue.home());
        assert!(!state.both_submitted());
    }

    #[test]
    fn test_unit_at_searches_both_sides() {
        let state = MatchState::standard();
        let corner = Position::new(4, 4).unwrap();
        assert_eq!(state.unit_at(corner).map(|u| u.id.as_str()), Some("B2"));
        assert!(state.unit_at(Position::new(2, 2).unwrap()).is_none());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_value(MatchState::standard()).unwrap();
        assert_eq!(json["turnNumber"], 1);
        assert_eq!(json["isOver"], false);
        assert_eq!(json["red"]["units"][0]["maxHp"], 30);
    }

    #[test]
    fn test_pending_batch_not_serialized() {
        let mut state = MatchState::standard();
        state.red.pending = Some(Vec::new());
        let json = serde_json::to_value(&state).unwrap();
        assert!(json["red"].get("pending").is_none());
    }

    #[test]
    fn test_empty_batches_are_not_ready() {
        let mut state = MatchState::standard();
        state.red.pending = Some(Vec::new());
        state.blue.pending = Some(Vec::new());
        assert!(!state.both_submitted());

        state.red.pending = Some(vec![crate::Action::move_to("R1", 1, 0)]);
        state.blue.pending = Some(vec![crate::Action::move_to("B1", 0, 3)]);
        assert!(state.both_submitted());
    }
}
