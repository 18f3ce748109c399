//! WebSocket message formats.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use crate::agents::{Agent, AgentKind};
use crate::error::Rejection;
use crate::session::{Envelope, ParticipantId, Recipient, SessionEvent, SessionId};
use mindmatrix_rules::{ActionBatch, MatchState, Side};
use serde::{Deserialize, Serialize};

/// Messages a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    /// Register this connection as an agent.
    AgentRegister {
        /// Display name.
        #[serde(default)]
        name: Option<String>,
        /// Agent kind, `ai` when omitted.
        #[serde(rename = "type", default)]
        kind: AgentKind,
    },
    /// Take a seat in a game.
    JoinGame {
        /// Game to join.
        game_id: SessionId,
        /// Seat to take.
        color: Side,
    },
    /// Submit this turn's batch for the seat taken on this connection.
    SubmitActions {
        /// Game the batch is for.
        game_id: SessionId,
        /// The batch.
        actions: ActionBatch,
    },
    /// Watch a game without taking a seat.
    SpectateGame {
        /// Game to watch.
        game_id: SessionId,
    },
}

impl ClientMessage {
    /// Decodes a text frame.
    pub fn parse(text: &str) -> Result<Self, Rejection> {
        serde_json::from_str(text).map_err(|e| Rejection::Malformed(e.to_string()))
    }
}

/// Messages the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// Registration succeeded.
    AgentRegistered(Agent),
    /// Full state, sent to one connection on join or spectate.
    GameState(MatchState),
    /// Full state, sent to every connection after a resolution.
    GameUpdate(MatchState),
    /// Someone took a seat.
    PlayerJoined {
        /// Seat taken.
        color: Side,
        /// Participant now seated.
        agent_id: ParticipantId,
    },
    /// The game ended.
    GameOver {
        /// Winning side.
        winner: Side,
    },
    /// A request from this connection was refused.
    Error {
        /// Human-readable reason.
        message: String,
        /// Machine-readable reason, see [`Rejection::code`].
        code: String,
    },
}

impl From<&Rejection> for ServerMessage {
    fn from(rejection: &Rejection) -> Self {
        ServerMessage::Error {
            message: rejection.to_string(),
            code: rejection.code().to_string(),
        }
    }
}

impl From<Envelope> for ServerMessage {
    fn from(envelope: Envelope) -> Self {
        match envelope.event {
            SessionEvent::Joined { side, participant } => ServerMessage::PlayerJoined {
                color: side,
                agent_id: participant,
            },
            SessionEvent::StateChanged { state } => match envelope.recipient {
                Recipient::Participant(_) => ServerMessage::GameState(state),
                Recipient::All => ServerMessage::GameUpdate(state),
            },
            SessionEvent::GameOver { winner } => ServerMessage::GameOver { winner },
        }
    }
}
