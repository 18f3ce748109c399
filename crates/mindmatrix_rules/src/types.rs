//! Core domain types for MindMatrix.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Width and height of the square board.
pub const BOARD_SIZE: u8 = 5;

/// One of the two competing sides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// Red side (acts first within a turn).
    Red,
    /// Blue side.
    Blue,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    /// Returns this side's home cell.
    pub fn home(self) -> Position {
        match self {
            Side::Red => Position { x: 0, y: 0 },
            Side::Blue => Position { x: 0, y: 4 },
        }
    }
}

/// A cell coordinate on the board, always within `[0, BOARD_SIZE)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    x: u8,
    y: u8,
}

/// Unchecked coordinates as they arrive on the wire.
#[derive(Deserialize)]
struct RawPosition {
    x: i32,
    y: i32,
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.x, raw.y)
            .ok_or_else(|| format!("position ({}, {}) is off the board", raw.x, raw.y))
    }
}

impl Position {
    /// Creates a position, or `None` if the coordinates fall off the board.
    pub fn new(x: i32, y: i32) -> Option<Self> {
        let size = i32::from(BOARD_SIZE);
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Self {
                x: u8::try_from(x).ok()?,
                y: u8::try_from(y).ok()?,
            })
        } else {
            None
        }
    }

    /// Column coordinate.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Row coordinate.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Manhattan distance to another position.
    pub fn distance(&self, other: Position) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// Whether both coordinates lie on the board.
    pub fn in_bounds(&self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    /// Iterates every cell on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|x| (0..BOARD_SIZE).map(move |y| Position { x, y }))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unit archetype. Every per-unit constant is fixed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnitKind {
    /// Fast, fragile harvester.
    Scout,
    /// Slow melee bruiser.
    Warrior,
    /// Ranged caster with one step of movement.
    Mage,
}

impl UnitKind {
    /// Hit points a fresh unit of this kind starts with.
    pub fn max_hp(self) -> u32 {
        match self {
            UnitKind::Scout => 30,
            UnitKind::Warrior => 50,
            UnitKind::Mage => 20,
        }
    }

    /// Maximum Manhattan distance of a single move.
    pub fn move_budget(self) -> u32 {
        match self {
            UnitKind::Scout => 3,
            UnitKind::Warrior => 2,
            UnitKind::Mage => 1,
        }
    }

    /// Maximum Manhattan distance of an attack.
    pub fn attack_range(self) -> u32 {
        match self {
            UnitKind::Mage => 2,
            UnitKind::Scout | UnitKind::Warrior => 1,
        }
    }

    /// Damage dealt by one attack.
    pub fn damage(self) -> u32 {
        match self {
            UnitKind::Warrior => 10,
            UnitKind::Mage => 8,
            UnitKind::Scout => 5,
        }
    }
}

/// Kind of resource a deposit yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    /// Pure energy.
    Energy,
    /// Pure mind.
    Mind,
    /// A little of both.
    Gem,
}

impl ResourceKind {
    /// Resources credited to a side when one of its units harvests this kind.
    pub fn harvest_yield(self) -> Resources {
        match self {
            ResourceKind::Energy => Resources::new(5, 0),
            ResourceKind::Mind => Resources::new(0, 5),
            ResourceKind::Gem => Resources::new(3, 3),
        }
    }
}

/// A side's stockpile. Both counters are unbounded above and never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resources {
    /// Spent on movement.
    pub energy: u32,
    /// Only counts towards the resource victory.
    pub mind: u32,
}

impl Resources {
    /// Creates a resource record.
    pub fn new(energy: u32, mind: u32) -> Self {
        Self { energy, mind }
    }

    /// Adds another record to this one.
    pub fn credit(&mut self, other: Resources) {
        self.energy = self.energy.saturating_add(other.energy);
        self.mind = self.mind.saturating_add(other.mind);
    }

    /// Removes `cost` energy if enough is available. Returns whether the debit happened.
    pub fn debit_energy(&mut self, cost: u32) -> bool {
        match self.energy.checked_sub(cost) {
            Some(rest) => {
                self.energy = rest;
                true
            }
            None => false,
        }
    }
}
