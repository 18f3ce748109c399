//! Turn resolution scenarios and properties.

use mindmatrix_rules::invariants::{InvariantSet, MatchInvariants};
use mindmatrix_rules::{
    Action, ActionOutcome, Board, IgnoreReason, MatchState, Position, Resources, Side, SideState,
    Unit, UnitKind, VictoryCondition, apply_action, resolve_turn,
};
use proptest::prelude::*;

fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y).expect("test position on board")
}

fn skirmish(red: Vec<Unit>, blue: Vec<Unit>) -> MatchState {
    MatchState::with_sides(
        Board::empty(),
        SideState::new(red, Resources::new(50, 30)),
        SideState::new(blue, Resources::new(50, 30)),
    )
}

#[test]
fn test_opening_turn_both_sides_move() {
    let state = MatchState::standard();
    let resolution = resolve_turn(
        &state,
        &[Action::move_to("R1", 1, 1)],
        &[Action::move_to("B1", 1, 3)],
    );
    let next = resolution.state;

    assert_eq!(next.turn_number, 2);
    assert_eq!(next.red.unit("R1").unwrap().position, pos(1, 1));
    assert_eq!(next.blue.unit("B1").unwrap().position, pos(1, 3));
    // Red: 50 - 4 (two cells) + 3 (gem) + 5 (income); mind 30 + 3 + 2.
    assert_eq!(next.red.resources, Resources::new(54, 35));
    // Blue: 50 - 4 + 5 (income); mind 30 + 5 (mind deposit) + 2.
    assert_eq!(next.blue.resources, Resources::new(51, 37));
    assert!(!next.is_over);
}

#[test]
fn test_red_acts_before_blue() {
    // R1 vacates (2, 1); B1 wants to step into it.
    let state = skirmish(
        vec![Unit::new("R1", UnitKind::Scout, pos(2, 1))],
        vec![Unit::new("B1", UnitKind::Scout, pos(2, 2))],
    );
    let red = [Action::move_to("R1", 3, 1)];
    let blue = [Action::move_to("B1", 2, 1)];

    let resolved = resolve_turn(&state, &red, &blue);
    assert_eq!(resolved.blue_outcomes, vec![ActionOutcome::Applied]);
    assert_eq!(resolved.state.blue.unit("B1").unwrap().position, pos(2, 1));

    // The same actions in the opposite order leave B1 blocked.
    let mut reversed = state.clone();
    let blue_first = apply_action(&mut reversed, Side::Blue, &blue[0]);
    apply_action(&mut reversed, Side::Red, &red[0]);
    assert_eq!(blue_first, ActionOutcome::Ignored(IgnoreReason::Occupied("R1".into())));
    assert_eq!(reversed.blue.unit("B1").unwrap().position, pos(2, 2));
}

#[test]
fn test_unit_killed_by_red_cannot_act_for_blue() {
    let mut state = skirmish(
        vec![Unit::new("R1", UnitKind::Warrior, pos(2, 2))],
        vec![Unit::new("B1", UnitKind::Mage, pos(2, 3))],
    );
    state.blue.unit_mut("B1").unwrap().hp = 10;

    let resolved = resolve_turn(
        &state,
        &[Action::attack("R1", "B1")],
        &[Action::attack("B1", "R1")],
    );
    assert!(matches!(
        resolved.blue_outcomes[0],
        ActionOutcome::Ignored(IgnoreReason::UnknownUnit(Side::Blue, _))
    ));
    assert_eq!(resolved.state.red.unit("R1").unwrap().hp, 50);
    assert_eq!(resolved.victory.map(|v| v.condition), Some(VictoryCondition::Annihilation));
}

#[test]
fn test_warrior_wears_down_scout_over_three_turns() {
    let mut state = skirmish(
        vec![
            Unit::new("R1", UnitKind::Warrior, pos(2, 2)),
            Unit::new("R2", UnitKind::Scout, pos(4, 0)),
        ],
        vec![
            Unit::new("B1", UnitKind::Scout, pos(2, 3)),
            Unit::new("B2", UnitKind::Scout, pos(4, 4)),
        ],
    );
    let strike = [Action::attack("R1", "B1")];

    state = resolve_turn(&state, &strike, &[]).state;
    state = resolve_turn(&state, &strike, &[]).state;
    assert_eq!(state.blue.unit("B1").unwrap().hp, 10);

    state = resolve_turn(&state, &strike, &[]).state;
    assert!(state.blue.unit("B1").is_none());
    assert_eq!(state.blue.units.len(), 1);
    assert_eq!(state.turn_number, 4);
}

#[test]
fn test_out_of_budget_move_and_range_are_noops() {
    let state = MatchState::standard();
    let resolved = resolve_turn(
        &state,
        // Scout budget is 3; (0,0) -> (2,2) is 4 away.
        &[Action::move_to("R1", 2, 2), Action::attack("R2", "B2")],
        &[],
    );
    assert!(resolved.red_outcomes.iter().all(|o| !o.is_applied()));
    assert_eq!(resolved.state.red.unit("R1").unwrap().position, pos(0, 0));
    // Only income changed red's resources.
    assert_eq!(resolved.state.red.resources, Resources::new(55, 32));
    assert_eq!(resolved.state.board, state.board);
}

#[test]
fn test_annihilation_outranks_resource_threshold() {
    let mut state = skirmish(
        vec![Unit::new("R1", UnitKind::Warrior, pos(2, 2))],
        vec![Unit::new("B1", UnitKind::Scout, pos(2, 3))],
    );
    state.red.units.clear();
    state.red.resources = Resources::new(150, 80);

    let resolved = resolve_turn(&state, &[], &[]);
    let victory = resolved.victory.expect("game decided");
    assert_eq!(victory.winner, Side::Blue);
    assert_eq!(victory.condition, VictoryCondition::Annihilation);
}

#[test]
fn test_double_annihilation_keeps_playing() {
    // Known underspecified case: no winner is declared and the game goes on.
    let state = skirmish(vec![], vec![]);
    let resolved = resolve_turn(&state, &[], &[]);
    assert_eq!(resolved.victory, None);
    assert!(!resolved.state.is_over);
    assert_eq!(resolved.state.turn_number, 2);
}

#[test]
fn test_income_paid_to_side_without_units() {
    let mut state = MatchState::standard();
    state.red.units.retain(|u| u.id == "R1");
    let resolved = resolve_turn(&state, &[], &[]);
    assert_eq!(resolved.state.blue.resources, Resources::new(55, 32));
}

// ─────────────────────────────────────────────────────────────
//  Properties
// ─────────────────────────────────────────────────────────────

fn arb_unit_id() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["R1", "R2", "B1", "B2", "Z9"]).prop_map(String::from)
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (arb_unit_id(), -1..6i32, -1..6i32).prop_map(|(id, x, y)| Action::move_to(id, x, y)),
        (arb_unit_id(), arb_unit_id()).prop_map(|(id, target)| Action::attack(id, target)),
    ]
}

fn arb_turns() -> impl Strategy<Value = Vec<(Vec<Action>, Vec<Action>)>> {
    prop::collection::vec(
        (
            prop::collection::vec(arb_action(), 0..6),
            prop::collection::vec(arb_action(), 0..6),
        ),
        1..12,
    )
}

proptest! {
    #[test]
    fn prop_resolution_is_deterministic(turns in arb_turns()) {
        let mut state = MatchState::standard();
        for (red, blue) in turns {
            let first = resolve_turn(&state, &red, &blue);
            let second = resolve_turn(&state, &red, &blue);
            prop_assert_eq!(&first, &second);
            if first.state.is_over {
                break;
            }
            state = first.state;
        }
    }

    #[test]
    fn prop_resolution_conserves(turns in arb_turns()) {
        let mut state = MatchState::standard();
        for (red, blue) in turns {
            let next = resolve_turn(&state, &red, &blue).state;

            prop_assert!(next.red.units.len() <= state.red.units.len());
            prop_assert!(next.blue.units.len() <= state.blue.units.len());
            for (pos, deposit) in next.board.deposits() {
                let before = state.board.deposit(pos).map(|d| d.remaining).unwrap_or(0);
                prop_assert!(deposit.remaining <= before);
            }
            prop_assert!(MatchInvariants::check_all(&next).is_ok());
            prop_assert!(next.turn_number >= state.turn_number);

            if next.is_over {
                prop_assert!(next.winner.is_some());
                break;
            }
            prop_assert_eq!(next.turn_number, state.turn_number + 1);
            state = next;
        }
    }
}
