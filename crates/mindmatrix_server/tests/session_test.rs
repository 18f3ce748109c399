//! Session task tests: joins, submissions and the turn timer.

use mindmatrix_rules::{Action, MatchState, Position, Resources, Side};
use mindmatrix_server::session::{FallbackPlanner, Recipient, Session};
use mindmatrix_server::{
    Envelope, FallbackStrategy, Phase, Rejection, SessionEvent, SessionHandle, SessionSettings,
};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant};

fn settings() -> SessionSettings {
    SessionSettings {
        turn_interval: Duration::from_secs(20),
        fallback: FallbackStrategy::Idle,
        rng_seed: Some(1),
        event_buffer: 64,
    }
}

async fn next_envelope(events: &mut broadcast::Receiver<Envelope>) -> Envelope {
    events.recv().await.expect("session event")
}

/// Waits for the next broadcast state, skipping joins and direct messages.
async fn next_update(events: &mut broadcast::Receiver<Envelope>) -> MatchState {
    loop {
        let envelope = next_envelope(events).await;
        if let (Recipient::All, SessionEvent::StateChanged { state }) =
            (envelope.recipient, envelope.event)
        {
            return state;
        }
    }
}

fn assert_elapsed(start: Instant, secs: u64) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs + 1),
        "expected about {secs}s, got {elapsed:?}"
    );
}

async fn live(handle: &SessionHandle) -> broadcast::Receiver<Envelope> {
    let subscription = handle.subscribe().await.unwrap();
    handle.join(Side::Red, "alice").await.unwrap();
    handle.join(Side::Blue, "bob").await.unwrap();
    subscription.events
}

#[tokio::test(start_paused = true)]
async fn test_timer_resolves_silent_turn() {
    let start = Instant::now();
    let handle = SessionHandle::spawn("game_timer".into(), &settings());
    let mut events = live(&handle).await;

    let state = next_update(&mut events).await;
    assert_elapsed(start, 20);
    assert_eq!(state.turn_number, 2);
    assert_eq!(state.current_turn_side, Side::Blue);
    assert_eq!(state.red.resources, Resources::new(55, 32));
    assert_eq!(state.blue.resources, Resources::new(55, 32));
}

#[tokio::test(start_paused = true)]
async fn test_timer_waits_while_forming() {
    let handle = SessionHandle::spawn("game_forming".into(), &settings());
    handle.join(Side::Red, "alice").await.unwrap();

    time::advance(Duration::from_secs(120)).await;
    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.turn_number, 1);
    assert_eq!(handle.summary().await.unwrap().phase, Phase::Forming);
}

#[tokio::test(start_paused = true)]
async fn test_early_resolution_restarts_deadline() {
    let start = Instant::now();
    let handle = SessionHandle::spawn("game_reset".into(), &settings());
    let mut events = live(&handle).await;

    time::advance(Duration::from_secs(15)).await;
    handle
        .submit(Side::Red, "alice", vec![Action::move_to("R1", 1, 1)])
        .await
        .unwrap();
    handle
        .submit(Side::Blue, "bob", vec![Action::move_to("B1", 1, 3)])
        .await
        .unwrap();

    let state = next_update(&mut events).await;
    assert_eq!(state.turn_number, 2);
    assert_elapsed(start, 15);

    // The next deadline is a full interval after the early resolution.
    let state = next_update(&mut events).await;
    assert_eq!(state.turn_number, 3);
    assert_elapsed(start, 35);
}

#[tokio::test(start_paused = true)]
async fn test_empty_submissions_wait_for_deadline() {
    let start = Instant::now();
    let handle = SessionHandle::spawn("game_empty".into(), &settings());
    let mut events = live(&handle).await;

    handle.submit(Side::Red, "alice", vec![]).await.unwrap();
    handle.submit(Side::Blue, "bob", vec![]).await.unwrap();
    assert_eq!(handle.snapshot().await.unwrap().turn_number, 1);

    let state = next_update(&mut events).await;
    assert_eq!(state.turn_number, 2);
    assert_elapsed(start, 20);
}

#[tokio::test(start_paused = true)]
async fn test_timer_keeps_submitted_batch() {
    let handle = SessionHandle::spawn("game_partial".into(), &settings());
    let mut events = live(&handle).await;

    handle
        .submit(Side::Red, "alice", vec![Action::move_to("R1", 1, 0)])
        .await
        .unwrap();

    let state = next_update(&mut events).await;
    assert_eq!(state.turn_number, 2);
    assert_eq!(
        state.red.unit("R1").unwrap().position,
        Position::new(1, 0).unwrap()
    );
    assert_eq!(state.red.resources, Resources::new(53, 32));
    assert_eq!(state.blue.resources, Resources::new(55, 32));
}

#[tokio::test]
async fn test_join_events_and_rejections() {
    let handle = SessionHandle::spawn("game_join".into(), &settings());
    let mut events = handle.subscribe().await.unwrap().events;

    let state = handle.join(Side::Red, "alice").await.unwrap();
    assert_eq!(state, MatchState::standard());

    let direct = next_envelope(&mut events).await;
    assert!(direct.is_for("alice"));
    assert!(!direct.is_for("bob"));
    assert_eq!(
        next_envelope(&mut events).await,
        Envelope::broadcast(SessionEvent::Joined {
            side: Side::Red,
            participant: "alice".into()
        })
    );

    assert_eq!(
        handle.submit(Side::Red, "alice", vec![]).await,
        Err(Rejection::NotLive)
    );
    assert_eq!(
        handle.join(Side::Red, "mallory").await,
        Err(Rejection::SeatTaken(Side::Red))
    );

    handle.join(Side::Blue, "bob").await.unwrap();
    assert_eq!(
        handle.submit(Side::Blue, "alice", vec![]).await,
        Err(Rejection::NotOccupant(Side::Blue))
    );
    handle
        .submit(Side::Red, "alice", vec![Action::move_to("R1", 1, 0)])
        .await
        .unwrap();
    assert_eq!(
        handle
            .submit(Side::Red, "alice", vec![Action::move_to("R1", 0, 1)])
            .await,
        Err(Rejection::AlreadySubmitted(Side::Red))
    );

    let summary = handle.summary().await.unwrap();
    assert_eq!(summary.phase, Phase::Live);
    assert_eq!(summary.players.red.as_deref(), Some("alice"));
    assert_eq!(summary.players.blue.as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_both_submissions_resolve_without_timer() {
    let handle = SessionHandle::spawn("game_fast".into(), &settings());
    let mut events = live(&handle).await;

    handle
        .submit(Side::Red, "alice", vec![Action::move_to("R1", 1, 1)])
        .await
        .unwrap();
    handle
        .submit(Side::Blue, "bob", vec![Action::move_to("B1", 1, 3)])
        .await
        .unwrap();

    let state = next_update(&mut events).await;
    assert_eq!(state.turn_number, 2);
    assert_eq!(state.red.resources, Resources::new(54, 35));
    assert_eq!(state.blue.resources, Resources::new(51, 37));
    assert_eq!(handle.snapshot().await.unwrap(), state);
}

#[tokio::test(start_paused = true)]
async fn test_game_over_is_terminal() {
    let mut state = MatchState::standard();
    state.red.resources = Resources::new(100, 50);
    let session = Session::with_state(
        "game_over".into(),
        state,
        FallbackPlanner::new(FallbackStrategy::Idle, None),
    );
    let handle = SessionHandle::start(session, &settings());
    let mut events = live(&handle).await;

    // Nobody submits; the deadline resolves the turn and red is already rich.
    let finished = next_update(&mut events).await;
    assert!(finished.is_over);
    assert_eq!(finished.winner, Some(Side::Red));
    assert_eq!(finished.turn_number, 1);
    assert_eq!(
        next_envelope(&mut events).await,
        Envelope::broadcast(SessionEvent::GameOver { winner: Side::Red })
    );

    assert_eq!(
        handle.submit(Side::Red, "alice", vec![]).await,
        Err(Rejection::GameOver)
    );
    assert_eq!(handle.join(Side::Blue, "carol").await, Err(Rejection::GameOver));

    time::advance(Duration::from_secs(60)).await;
    assert_eq!(handle.snapshot().await.unwrap(), finished);
    assert_eq!(handle.summary().await.unwrap().phase, Phase::Resolved);
    assert!(events.try_recv().is_err());
}
