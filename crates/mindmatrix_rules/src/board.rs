//! The 5×5 board and its resource deposits.

use crate::types::{BOARD_SIZE, Position, ResourceKind, Resources};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Amount removed from a deposit by one harvest.
pub const HARVEST_DEPLETION: u32 = 5;

/// Starting amount of every deposit in the standard layout.
pub const DEPOSIT_AMOUNT: u32 = 10;

/// A resource deposit sitting on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// What the deposit yields.
    pub kind: ResourceKind,
    /// What is left. Never negative; a depleted deposit stays on the board at 0.
    pub remaining: u32,
}

impl Deposit {
    /// Creates a deposit.
    pub fn new(kind: ResourceKind, remaining: u32) -> Self {
        Self { kind, remaining }
    }
}

/// The game board. The layout of deposits never changes after creation;
/// only their `remaining` counters do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells indexed as `cells[x][y]`.
    cells: [[Option<Deposit>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// Creates a board with no deposits.
    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Creates the standard board: a 3×3 block of deposits in the middle,
    /// gems on the diagonal corners and centre.
    pub fn standard() -> Self {
        const LAYOUT: [(i32, i32, ResourceKind); 9] = [
            (1, 1, ResourceKind::Gem),
            (1, 2, ResourceKind::Energy),
            (1, 3, ResourceKind::Mind),
            (2, 1, ResourceKind::Energy),
            (2, 2, ResourceKind::Gem),
            (2, 3, ResourceKind::Energy),
            (3, 1, ResourceKind::Mind),
            (3, 2, ResourceKind::Energy),
            (3, 3, ResourceKind::Gem),
        ];

        let mut board = Self::empty();
        for (x, y, kind) in LAYOUT {
            if let Some(pos) = Position::new(x, y) {
                board.place(pos, Deposit::new(kind, DEPOSIT_AMOUNT));
            }
        }
        board
    }

    /// Puts a deposit on a cell, replacing whatever was there.
    pub fn place(&mut self, pos: Position, deposit: Deposit) {
        self.cells[usize::from(pos.x())][usize::from(pos.y())] = Some(deposit);
    }

    /// Returns the deposit at a cell, if any.
    pub fn deposit(&self, pos: Position) -> Option<&Deposit> {
        self.cells[usize::from(pos.x())][usize::from(pos.y())].as_ref()
    }

    /// Iterates all deposits with their positions.
    pub fn deposits(&self) -> impl Iterator<Item = (Position, &Deposit)> {
        Position::all().filter_map(|pos| self.deposit(pos).map(|d| (pos, d)))
    }

    /// Harvests the deposit at `pos`.
    ///
    /// Returns the yield to credit, or `None` if the cell is empty or the
    /// deposit is exhausted. `remaining` drops by [`HARVEST_DEPLETION`],
    /// floored at zero.
    #[instrument(skip(self))]
    pub fn harvest(&mut self, pos: Position) -> Option<Resources> {
        let deposit = self.cells[usize::from(pos.x())][usize::from(pos.y())].as_mut()?;
        if deposit.remaining == 0 {
            debug!(kind = %deposit.kind, "Deposit exhausted");
            return None;
        }
        deposit.remaining = deposit.remaining.saturating_sub(HARVEST_DEPLETION);
        debug!(kind = %deposit.kind, remaining = deposit.remaining, "Harvested deposit");
        Some(deposit.kind.harvest_yield())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
