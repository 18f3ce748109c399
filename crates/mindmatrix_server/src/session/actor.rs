//! Session owner task.
//!
//! Each session runs on its own task. Joins, submissions, subscriptions and
//! timer ticks are all handled there one at a time, so no two of them ever
//! interleave. Callers talk to it through a cloneable [`SessionHandle`].

use super::events::Envelope;
use super::fallback::{FallbackPlanner, FallbackStrategy};
use super::machine::Session;
use super::{ParticipantId, Phase, SessionId, SessionSummary};
use crate::error::Rejection;
use mindmatrix_rules::{ActionBatch, MatchState, Side};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{Instrument, debug, info, info_span, instrument, trace};

const COMMAND_BUFFER: usize = 32;

/// Per-session runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Deadline for each turn once the session is live.
    pub turn_interval: Duration,
    /// What to submit for a side that misses the deadline.
    pub fallback: FallbackStrategy,
    /// Seed for the fallback planner. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Capacity of the event channel. Slow subscribers that fall further
    /// behind than this skip events.
    pub event_buffer: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            turn_interval: Duration::from_secs(20),
            fallback: FallbackStrategy::default(),
            rng_seed: None,
            event_buffer: 64,
        }
    }
}

/// The current state plus every event published after it.
#[derive(Debug)]
pub struct Subscription {
    /// State at the moment of subscribing.
    pub state: MatchState,
    /// Events published from then on.
    pub events: broadcast::Receiver<Envelope>,
}

enum Command {
    Join {
        side: Side,
        participant: ParticipantId,
        reply: oneshot::Sender<Result<MatchState, Rejection>>,
    },
    Submit {
        side: Side,
        participant: ParticipantId,
        batch: ActionBatch,
        reply: oneshot::Sender<Result<(), Rejection>>,
    },
    Subscribe {
        reply: oneshot::Sender<Subscription>,
    },
    Snapshot {
        reply: oneshot::Sender<MatchState>,
    },
    Summary {
        reply: oneshot::Sender<SessionSummary>,
    },
}

/// Handle to a running session task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Starts a fresh session with the standard opening.
    pub fn spawn(id: SessionId, settings: &SessionSettings) -> Self {
        let fallback = FallbackPlanner::new(settings.fallback, settings.rng_seed);
        Self::start(Session::new(id, fallback), settings)
    }

    /// Runs an already constructed session on its own task.
    #[instrument(skip(session, settings), fields(session_id = %session.id()))]
    pub fn start(session: Session, settings: &SessionSettings) -> Self {
        let id = session.id().clone();
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(settings.event_buffer.max(1));
        let span = info_span!("session", session_id = %id);

        tokio::spawn(run(session, rx, events, settings.turn_interval).instrument(span));
        info!(interval = ?settings.turn_interval, "Session task started");

        Self { id, tx }
    }

    /// Session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Seats `participant` on `side` and returns the state at that moment.
    pub async fn join(
        &self,
        side: Side,
        participant: impl Into<ParticipantId>,
    ) -> Result<MatchState, Rejection> {
        let participant = participant.into();
        self.request(|reply| Command::Join {
            side,
            participant,
            reply,
        })
        .await?
    }

    /// Submits `side`'s batch for the current turn.
    pub async fn submit(
        &self,
        side: Side,
        participant: impl Into<ParticipantId>,
        batch: ActionBatch,
    ) -> Result<(), Rejection> {
        let participant = participant.into();
        self.request(|reply| Command::Submit {
            side,
            participant,
            batch,
            reply,
        })
        .await?
    }

    /// Subscribes to the session's events.
    pub async fn subscribe(&self) -> Result<Subscription, Rejection> {
        self.request(|reply| Command::Subscribe { reply }).await
    }

    /// Current match state.
    pub async fn snapshot(&self) -> Result<MatchState, Rejection> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Listing entry for this session.
    pub async fn summary(&self) -> Result<SessionSummary, Rejection> {
        self.request(|reply| Command::Summary { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, Rejection> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| Rejection::SessionClosed)?;
        response.await.map_err(|_| Rejection::SessionClosed)
    }
}

async fn run(
    mut session: Session,
    mut commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Envelope>,
    turn_interval: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + turn_interval, turn_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let live = session.phase() == Phase::Live;

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("All handles dropped, stopping session task");
                    break;
                };
                let turn = session.state().turn_number;
                handle(&mut session, command, &events);

                // A fresh turn gets the full interval, whether it began by
                // going live or by both sides submitting early.
                let now_live = session.phase() == Phase::Live;
                if now_live && (!live || session.state().turn_number != turn) {
                    trace!("Turn timer reset");
                    ticker.reset();
                }
            }
            _ = ticker.tick(), if live => {
                let envelopes = session.timer_fired();
                publish(&events, envelopes);
            }
        }
    }
}

fn handle(session: &mut Session, command: Command, events: &broadcast::Sender<Envelope>) {
    match command {
        Command::Join {
            side,
            participant,
            reply,
        } => {
            let result = session.join(side, participant).map(|envelopes| {
                publish(events, envelopes);
                session.state().clone()
            });
            reply.send(result).ok();
        }
        Command::Submit {
            side,
            participant,
            batch,
            reply,
        } => {
            let result = session
                .submit(side, &participant, batch)
                .map(|envelopes| publish(events, envelopes));
            reply.send(result).ok();
        }
        Command::Subscribe { reply } => {
            reply
                .send(Subscription {
                    state: session.state().clone(),
                    events: events.subscribe(),
                })
                .ok();
        }
        Command::Snapshot { reply } => {
            reply.send(session.state().clone()).ok();
        }
        Command::Summary { reply } => {
            reply.send(session.summary()).ok();
        }
    }
}

fn publish(events: &broadcast::Sender<Envelope>, envelopes: Vec<Envelope>) {
    for envelope in envelopes {
        if events.send(envelope).is_err() {
            trace!("No subscribers for session event");
        }
    }
}
