//! The session state machine.
//!
//! `Forming` → `Live` → `Resolved`. Every transition returns the envelopes
//! to publish; publishing happens after the transition and cannot undo it.

use super::events::{Envelope, SessionEvent};
use super::fallback::FallbackPlanner;
use super::{ParticipantId, Phase, Seats, SessionId, SessionSummary};
use crate::error::Rejection;
use mindmatrix_rules::{ActionBatch, MatchState, Side, resolve_turn};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// One match and its seats.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    state: MatchState,
    seats: Seats,
    phase: Phase,
    fallback: FallbackPlanner,
}

impl Session {
    /// Creates a session with the standard opening and no participants.
    #[instrument(skip(fallback))]
    pub fn new(id: SessionId, fallback: FallbackPlanner) -> Self {
        Self::with_state(id, MatchState::standard(), fallback)
    }

    /// Creates a session starting from an arbitrary state.
    pub fn with_state(id: SessionId, state: MatchState, fallback: FallbackPlanner) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            state,
            seats: Seats::default(),
            phase: Phase::Forming,
            fallback,
        }
    }

    /// Session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seat occupancy.
    pub fn seats(&self) -> &Seats {
        &self.seats
    }

    /// Listing entry.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            players: self.seats.clone(),
            turn: self.state.turn_number,
            phase: self.phase,
            winner: self.state.winner,
        }
    }

    /// Seats a participant.
    ///
    /// Filling the second seat moves the session to `Live`.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn join(&mut self, side: Side, participant: ParticipantId) -> Result<Vec<Envelope>, Rejection> {
        if self.phase == Phase::Resolved {
            warn!("Join after game over");
            return Err(Rejection::GameOver);
        }
        if self.seats.occupant(side).is_some() {
            warn!("Seat already taken");
            return Err(Rejection::SeatTaken(side));
        }

        self.seats.occupy(side, participant.clone());
        info!("Participant seated");

        let envelopes = vec![
            Envelope::to(
                participant.clone(),
                SessionEvent::StateChanged {
                    state: self.state.clone(),
                },
            ),
            Envelope::broadcast(SessionEvent::Joined { side, participant }),
        ];

        if self.seats.full() {
            self.phase = Phase::Live;
            info!("Both seats filled, game is live");
        }

        Ok(envelopes)
    }

    /// Stores a side's batch for this turn, resolving at once if the other
    /// side has already submitted.
    ///
    /// An empty batch is accepted but not stored: the side still counts as
    /// not submitted, so it may send a real batch later or be covered by the
    /// timer's fallback.
    #[instrument(skip(self, batch), fields(session_id = %self.id, actions = batch.len()))]
    pub fn submit(
        &mut self,
        side: Side,
        participant: &str,
        batch: ActionBatch,
    ) -> Result<Vec<Envelope>, Rejection> {
        match self.phase {
            Phase::Resolved => return Err(Rejection::GameOver),
            Phase::Forming => return Err(Rejection::NotLive),
            Phase::Live => {}
        }
        if self.seats.occupant(side).map(String::as_str) != Some(participant) {
            warn!("Submission from non-occupant");
            return Err(Rejection::NotOccupant(side));
        }
        let pending = &mut self.state.side_mut(side).pending;
        if pending.is_some() {
            warn!("Duplicate submission");
            return Err(Rejection::AlreadySubmitted(side));
        }

        if batch.is_empty() {
            debug!("Empty batch, side still waiting");
            return Ok(Vec::new());
        }

        *pending = Some(batch);
        debug!("Batch stored");

        if self.state.both_submitted() {
            Ok(self.resolve())
        } else {
            Ok(Vec::new())
        }
    }

    /// Handles a turn timer tick.
    ///
    /// Every side still missing a batch gets a fallback batch, then the turn
    /// resolves whatever the batches contain. Outside `Live` a tick does
    /// nothing.
    #[instrument(skip(self), fields(session_id = %self.id, turn = self.state.turn_number))]
    pub fn timer_fired(&mut self) -> Vec<Envelope> {
        if self.phase != Phase::Live {
            return Vec::new();
        }

        for side in Side::iter() {
            if self.state.side(side).pending.is_none() {
                let batch = self.fallback.plan(&self.state, side);
                info!(%side, actions = batch.len(), "Turn timed out, using fallback batch");
                self.state.side_mut(side).pending = Some(batch);
            }
        }

        self.resolve()
    }

    fn resolve(&mut self) -> Vec<Envelope> {
        let red = self.state.red.pending.take().unwrap_or_default();
        let blue = self.state.blue.pending.take().unwrap_or_default();
        let resolution = resolve_turn(&self.state, &red, &blue);
        self.state = resolution.state;

        info!(
            session_id = %self.id,
            turn = self.state.turn_number,
            red_energy = self.state.red.resources.energy,
            blue_energy = self.state.blue.resources.energy,
            "Turn resolved"
        );

        let mut envelopes = vec![Envelope::broadcast(SessionEvent::StateChanged {
            state: self.state.clone(),
        })];

        if let Some(victory) = resolution.victory {
            self.phase = Phase::Resolved;
            info!(session_id = %self.id, winner = %victory.winner, "Game over");
            envelopes.push(Envelope::broadcast(SessionEvent::GameOver {
                winner: victory.winner,
            }));
        }

        envelopes
    }
}
