//! HTTP routes.

use crate::agents::{Agent, AgentId, AgentKind, AgentRegistry};
use crate::error::Rejection;
use crate::registry::SessionRegistry;
use crate::session::{SessionId, SessionSummary};
use crate::ws;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_new::new;
use mindmatrix_rules::{ActionBatch, MatchState, Side};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, instrument, warn};

/// Shared state behind every route.
#[derive(Debug, Clone, new)]
pub struct AppState {
    sessions: SessionRegistry,
    agents: AgentRegistry,
    #[new(default)]
    connections: Arc<AtomicU64>,
}

impl AppState {
    /// Session registry.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Agent registry.
    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Id for a connection that has not registered as an agent.
    pub(crate) fn next_connection_id(&self) -> String {
        format!("conn_{}", self.connections.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Body of `POST /api/agents/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Agent kind, `ai` when omitted.
    #[serde(rename = "type", default)]
    pub kind: AgentKind,
}

/// Response of `POST /api/agents/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Id to use in later requests.
    pub agent_id: AgentId,
    /// The full record.
    #[serde(flatten)]
    pub agent: Agent,
}

/// Response of `POST /api/games/new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResponse {
    /// New game's id.
    pub game_id: SessionId,
    /// Human-readable confirmation.
    pub message: String,
}

/// Body of `POST /api/games/{id}/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Registered agent taking the seat.
    pub agent_id: AgentId,
    /// Seat to take.
    pub color: Side,
}

/// Response of `POST /api/games/{id}/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    /// Always true; failures are error responses.
    pub success: bool,
    /// Game joined.
    pub game_id: SessionId,
    /// Seat taken.
    pub color: Side,
    /// State at the moment of joining.
    pub state: MatchState,
}

/// Body of `POST /api/games/{id}/actions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Agent occupying `color`.
    pub agent_id: AgentId,
    /// Seat the batch is for.
    pub color: Side,
    /// The batch.
    pub actions: ActionBatch,
}

/// Response of `POST /api/games/{id}/actions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Always true; failures are error responses.
    pub success: bool,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = match &self {
            r if r.is_not_found() => StatusCode::NOT_FOUND,
            Rejection::SessionClosed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        warn!(%status, code = self.code(), error = %self, "Request rejected");
        (
            status,
            Json(serde_json::json!({"error": self.to_string(), "code": self.code()})),
        )
            .into_response()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs", get(api_docs))
        .route("/api/games", get(list_games))
        .route("/api/games/new", post(new_game))
        .route("/api/agents/register", post(register_agent))
        .route("/api/games/{id}/join", post(join_game))
        .route("/api/games/{id}/actions", post(submit_actions))
        .route("/api/games/{id}/spectate", get(spectate))
        .route("/ws", get(ws::upgrade))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true, "service": "mindmatrix"}))
}

async fn api_docs() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "rest": [
            {"method": "GET", "path": "/api/games", "description": "List all games"},
            {"method": "POST", "path": "/api/games/new", "description": "Create a new game"},
            {"method": "POST", "path": "/api/agents/register", "description": "Register an agent"},
            {"method": "POST", "path": "/api/games/{id}/join", "description": "Take a seat in a game"},
            {"method": "POST", "path": "/api/games/{id}/actions", "description": "Submit this turn's actions"},
            {"method": "GET", "path": "/api/games/{id}/spectate", "description": "Current state of a game"},
        ],
        "websocket": {
            "path": "/ws",
            "client": ["agent_register", "join_game", "submit_actions", "spectate_game"],
            "server": ["agent_registered", "game_state", "game_update", "player_joined", "game_over", "error"],
        },
    }))
}

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> Json<Vec<SessionSummary>> {
    Json(state.sessions.list().await)
}

#[instrument(skip(state))]
async fn new_game(State(state): State<AppState>) -> Json<NewGameResponse> {
    let handle = state.sessions.create_session().await;
    Json(NewGameResponse {
        game_id: handle.id().clone(),
        message: "Game created".to_string(),
    })
}

#[instrument(skip(state, req))]
async fn register_agent(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Json<RegisterResponse> {
    let name = req.name.unwrap_or_else(|| "Unknown Agent".to_string());
    let agent = state.agents.register(name, req.kind).await;
    Json(RegisterResponse {
        agent_id: agent.id.clone(),
        agent,
    })
}

#[instrument(skip(state, req), fields(agent_id = %req.agent_id, color = %req.color))]
async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, Rejection> {
    let session = state.sessions.get(&id).await?;
    state.agents.get(&req.agent_id).await?;

    let match_state = session.join(req.color, req.agent_id.clone()).await?;
    info!(session_id = %id, "Agent joined over HTTP");

    Ok(Json(JoinResponse {
        success: true,
        game_id: id,
        color: req.color,
        state: match_state,
    }))
}

#[instrument(skip(state, req), fields(agent_id = %req.agent_id, color = %req.color, actions = req.actions.len()))]
async fn submit_actions(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, Rejection> {
    let session = state.sessions.get(&id).await?;
    session.submit(req.color, req.agent_id, req.actions).await?;
    Ok(Json(SubmitResponse { success: true }))
}

#[instrument(skip(state))]
async fn spectate(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<MatchState>, Rejection> {
    let session = state.sessions.get(&id).await?;
    Ok(Json(session.snapshot().await?))
}
