//! MindMatrix game logic.
//!
//! A simultaneous-turn tactics game for two sides on a 5×5 board. This crate
//! holds everything that is pure computation: the board and unit model, the
//! rules engine, turn resolution and victory evaluation. It performs no I/O
//! and uses no randomness.
//!
//! # Example
//!
//! ```
//! use mindmatrix_rules::{Action, MatchState, resolve_turn};
//!
//! let state = MatchState::standard();
//! let resolution = resolve_turn(
//!     &state,
//!     &[Action::move_to("R1", 1, 0)],
//!     &[Action::move_to("B2", 4, 3)],
//! );
//! assert_eq!(resolution.state.turn_number, 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
pub mod contracts;
pub mod invariants;
mod resolver;
pub mod rules;
mod state;
mod types;
mod unit;

pub use action::{Action, ActionBatch, ActionOutcome, IgnoreReason};
pub use board::{Board, DEPOSIT_AMOUNT, Deposit, HARVEST_DEPLETION};
pub use resolver::{Resolution, TURN_INCOME, resolve_turn};
pub use rules::victory::{Victory, VictoryCondition};
pub use rules::{apply_action, apply_attack, apply_move, check_victory};
pub use state::{MatchState, SideState};
pub use types::{BOARD_SIZE, Position, ResourceKind, Resources, Side, UnitKind};
pub use unit::{Unit, UnitId};
