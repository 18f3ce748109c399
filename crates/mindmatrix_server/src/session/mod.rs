//! Game session management.
//!
//! A session is one match plus the bookkeeping around it: who sits in which
//! seat, which lifecycle phase it is in, and the turn timer. The
//! [`Session`] state machine is synchronous; [`SessionHandle`] runs it on
//! its own task so every event for one session is serialized.

mod actor;
mod events;
mod fallback;
mod machine;

pub use actor::{SessionHandle, SessionSettings, Subscription};
pub use events::{Envelope, Recipient, SessionEvent};
pub use fallback::{FallbackPlanner, FallbackStrategy};
pub use machine::Session;

use mindmatrix_rules::Side;
use serde::{Deserialize, Serialize};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Unique identifier for a participant (player or observer).
pub type ParticipantId = String;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Fewer than two seats are occupied.
    Forming,
    /// Both seats occupied; collecting batches, timer running.
    Live,
    /// A side has won. Terminal.
    Resolved,
}

/// Seat occupancy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    /// Red seat occupant.
    pub red: Option<ParticipantId>,
    /// Blue seat occupant.
    pub blue: Option<ParticipantId>,
}

impl Seats {
    /// Returns the occupant of a seat.
    pub fn occupant(&self, side: Side) -> Option<&ParticipantId> {
        match side {
            Side::Red => self.red.as_ref(),
            Side::Blue => self.blue.as_ref(),
        }
    }

    pub(crate) fn occupy(&mut self, side: Side, participant: ParticipantId) {
        match side {
            Side::Red => self.red = Some(participant),
            Side::Blue => self.blue = Some(participant),
        }
    }

    /// Whether both seats are occupied.
    pub fn full(&self) -> bool {
        self.red.is_some() && self.blue.is_some()
    }
}

/// Listing entry for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session id.
    pub id: SessionId,
    /// Seat occupancy.
    pub players: Seats,
    /// Current turn number.
    pub turn: u32,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Winner, once decided.
    pub winner: Option<Side>,
}
