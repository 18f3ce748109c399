//! Outbound session events.

use super::ParticipantId;
use mindmatrix_rules::{MatchState, Side};
use serde::Serialize;

/// Something a session tells the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A participant took a seat.
    Joined {
        /// Seat taken.
        side: Side,
        /// Who took it.
        participant: ParticipantId,
    },
    /// The full match state, after a join or a resolution.
    StateChanged {
        /// New state.
        state: MatchState,
    },
    /// The match ended.
    GameOver {
        /// Winning side.
        winner: Side,
    },
}

/// Who an event is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// Every subscriber of the session.
    All,
    /// One participant only.
    Participant(ParticipantId),
}

/// An event addressed to its recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// Addressee.
    pub recipient: Recipient,
    /// Payload.
    pub event: SessionEvent,
}

impl Envelope {
    /// Addresses an event to every subscriber.
    pub fn broadcast(event: SessionEvent) -> Self {
        Self {
            recipient: Recipient::All,
            event,
        }
    }

    /// Addresses an event to one participant.
    pub fn to(participant: impl Into<ParticipantId>, event: SessionEvent) -> Self {
        Self {
            recipient: Recipient::Participant(participant.into()),
            event,
        }
    }

    /// Whether `participant` should receive this envelope.
    pub fn is_for(&self, participant: &str) -> bool {
        match &self.recipient {
            Recipient::All => true,
            Recipient::Participant(id) => id == participant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addressing() {
        let direct = Envelope::to("agent_1", SessionEvent::GameOver { winner: Side::Red });
        assert!(direct.is_for("agent_1"));
        assert!(!direct.is_for("agent_2"));

        let all = Envelope::broadcast(SessionEvent::GameOver { winner: Side::Red });
        assert!(all.is_for("anyone"));
    }
}
