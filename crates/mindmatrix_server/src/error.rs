//! Error types for the game server.

use crate::session::SessionId;
use derive_more::{Display, Error};
use mindmatrix_rules::Side;
use tracing::instrument;

/// Why a participant's request was refused.
///
/// Rejections go back to the offending participant only. The session state
/// is untouched and nothing about them is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    /// No session with this id exists.
    #[display("Game not found: {}", _0)]
    SessionNotFound(#[error(not(source))] SessionId),

    /// The agent id was never registered.
    #[display("Agent not registered: {}", _0)]
    AgentNotRegistered(#[error(not(source))] String),

    /// Someone already occupies this seat.
    #[display("Color already taken: {}", _0)]
    SeatTaken(#[error(not(source))] Side),

    /// The match is over; no further joins or submissions.
    #[display("Game is over")]
    GameOver,

    /// Submissions open only once both seats are filled.
    #[display("Game has not started")]
    NotLive,

    /// The submitter does not occupy the seat it submitted for.
    #[display("Not the {} player", _0)]
    NotOccupant(#[error(not(source))] Side),

    /// The seat already submitted this turn.
    #[display("Actions already submitted for {} this turn", _0)]
    AlreadySubmitted(#[error(not(source))] Side),

    /// The connection has not joined a game.
    #[display("Join a game before submitting actions")]
    NotJoined,

    /// The message could not be decoded.
    #[display("Malformed message: {}", _0)]
    Malformed(#[error(not(source))] String),

    /// The session's owner task is gone.
    #[display("Game session closed")]
    SessionClosed,
}

impl Rejection {
    /// Stable machine-readable reason code, e.g. `seat_taken`.
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Whether the rejection names a session that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Rejection::SessionNotFound(_))
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("Failed to read config file: {}", err))
    }
}

impl From<toml::de::Error> for ConfigError {
    #[track_caller]
    fn from(err: toml::de::Error) -> Self {
        Self::new(format!("Failed to parse config: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_codes() {
        assert_eq!(Rejection::SeatTaken(Side::Red).code(), "seat_taken");
        assert_eq!(Rejection::GameOver.code(), "game_over");
        assert_eq!(Rejection::AlreadySubmitted(Side::Blue).code(), "already_submitted");
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::SeatTaken(Side::Red).to_string(), "Color already taken: red");
        assert!(Rejection::SessionNotFound("game_1".into()).is_not_found());
        assert!(!Rejection::NotLive.is_not_found());
        assert!(!Rejection::AgentNotRegistered("agent_9".into()).is_not_found());
    }

    #[test]
    fn test_config_error_tracks_location() {
        let err = ConfigError::new("bad port");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().starts_with("Config error: bad port"));
    }
}
