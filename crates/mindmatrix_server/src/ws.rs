//! WebSocket transport.
//!
//! One task reads frames and drives requests, one writes outbound messages,
//! and one forwarder per watched game relays that game's events. Events
//! addressed to a single participant are only relayed to the connection
//! currently using that participant id. The outbound queue holds at most
//! `event_buffer` messages; a stalled socket makes its forwarders lag.

use crate::agents::AgentKind;
use crate::error::Rejection;
use crate::server::AppState;
use crate::session::{ParticipantId, SessionHandle, SessionId};
use crate::wire::{ClientMessage, ServerMessage};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use mindmatrix_rules::{ActionBatch, MatchState, Side};
use std::collections::HashMap;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

pub(crate) async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve(socket, state))
}

#[instrument(skip_all)]
async fn serve(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (out, mut outbox) = mpsc::channel::<ServerMessage>(state.sessions().settings().event_buffer.max(1));

    let writer = tokio::spawn(async move {
        while let Some(message) = outbox.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to encode outbound message");
                    continue;
                }
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut connection = Connection::new(state, out);
    info!(participant = %connection.participant(), "WebSocket connected");

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => connection.on_text(text.as_str()).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "WebSocket read failed");
                break;
            }
        }
    }

    info!(participant = %connection.participant(), "WebSocket disconnected");
    connection.close();
    writer.abort();
}

struct Seat {
    game_id: SessionId,
    session: SessionHandle,
    side: Side,
    participant: ParticipantId,
}

struct Connection {
    state: AppState,
    out: mpsc::Sender<ServerMessage>,
    who: watch::Sender<ParticipantId>,
    seat: Option<Seat>,
    forwarders: HashMap<SessionId, JoinHandle<()>>,
}

impl Connection {
    fn new(state: AppState, out: mpsc::Sender<ServerMessage>) -> Self {
        let (who, _) = watch::channel(state.next_connection_id());
        Self {
            state,
            out,
            who,
            seat: None,
            forwarders: HashMap::new(),
        }
    }

    fn participant(&self) -> ParticipantId {
        self.who.borrow().clone()
    }

    async fn send(&self, message: ServerMessage) {
        if self.out.send(message).await.is_err() {
            debug!("Writer gone, dropping message");
        }
    }

    async fn reject(&self, rejection: &Rejection) {
        warn!(participant = %self.participant(), code = rejection.code(), error = %rejection, "Rejected WebSocket request");
        self.send(ServerMessage::from(rejection)).await;
    }

    async fn on_text(&mut self, text: &str) {
        let result = match ClientMessage::parse(text) {
            Ok(ClientMessage::AgentRegister { name, kind }) => {
                self.register(name, kind).await;
                Ok(())
            }
            Ok(ClientMessage::JoinGame { game_id, color }) => self.join(game_id, color).await,
            Ok(ClientMessage::SubmitActions { game_id, actions }) => {
                self.submit(&game_id, actions).await
            }
            Ok(ClientMessage::SpectateGame { game_id }) => self.spectate(game_id).await,
            Err(rejection) => Err(rejection),
        };
        if let Err(rejection) = result {
            self.reject(&rejection).await;
        }
    }

    async fn register(&mut self, name: Option<String>, kind: AgentKind) {
        let name = name.unwrap_or_else(|| "Unknown Agent".to_string());
        let agent = self.state.agents().register(name, kind).await;
        self.who.send_replace(agent.id.clone());
        self.send(ServerMessage::AgentRegistered(agent)).await;
    }

    #[instrument(skip(self))]
    async fn join(&mut self, game_id: SessionId, color: Side) -> Result<(), Rejection> {
        let session = self.state.sessions().get(&game_id).await?;
        let newly_watched = !self.forwarders.contains_key(&game_id);
        if newly_watched {
            self.watch(&session).await?;
        }

        let participant = self.participant();
        match session.join(color, participant.clone()).await {
            Ok(_) => {
                info!(%participant, "Joined over WebSocket");
                self.seat = Some(Seat {
                    game_id,
                    session,
                    side: color,
                    participant,
                });
                Ok(())
            }
            Err(rejection) => {
                if newly_watched {
                    self.unwatch(&game_id);
                }
                Err(rejection)
            }
        }
    }

    async fn submit(&mut self, game_id: &str, actions: ActionBatch) -> Result<(), Rejection> {
        let seat = self
            .seat
            .as_ref()
            .filter(|seat| seat.game_id == game_id)
            .ok_or(Rejection::NotJoined)?;
        seat.session
            .submit(seat.side, seat.participant.clone(), actions)
            .await
    }

    async fn spectate(&mut self, game_id: SessionId) -> Result<(), Rejection> {
        let session = self.state.sessions().get(&game_id).await?;
        let state = if self.forwarders.contains_key(&game_id) {
            session.snapshot().await?
        } else {
            self.watch(&session).await?
        };
        self.send(ServerMessage::GameState(state)).await;
        Ok(())
    }

    /// Starts relaying `session`'s events and returns the state they follow.
    async fn watch(&mut self, session: &SessionHandle) -> Result<MatchState, Rejection> {
        let subscription = session.subscribe().await?;
        let mut events = subscription.events;
        let out = self.out.clone();
        let who = self.who.subscribe();
        let game_id = session.id().clone();

        let forwarder = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(envelope) => {
                        if !envelope.is_for(who.borrow().as_str()) {
                            continue;
                        }
                        if out.send(ServerMessage::from(envelope)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Subscriber lagged, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        debug!(session_id = %game_id, "Watching session");
        self.forwarders.insert(game_id, forwarder);
        Ok(subscription.state)
    }

    fn unwatch(&mut self, game_id: &str) {
        if let Some(forwarder) = self.forwarders.remove(game_id) {
            forwarder.abort();
        }
    }

    fn close(&mut self) {
        for (_, forwarder) in self.forwarders.drain() {
            forwarder.abort();
        }
    }
}
