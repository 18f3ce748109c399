//! MindMatrix game server.
//!
//! Hosts any number of concurrent matches and is the only authority on
//! their state. Clients talk to it over REST or a WebSocket.
//!
//! # Architecture
//!
//! - **Session**: the per-match state machine, run on its own task with a
//!   turn timer
//! - **Registry**: session and agent lookup
//! - **Server**: axum routes for REST and the `/ws` socket
//! - **Config**: TOML file, environment and command-line settings
//!
//! # Example
//!
//! ```no_run
//! use mindmatrix_server::{AgentRegistry, AppState, ServerConfig, SessionRegistry, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let state = AppState::new(
//!     SessionRegistry::new(config.session_settings()),
//!     AgentRegistry::new(),
//! );
//! let listener = tokio::net::TcpListener::bind(("127.0.0.1", 3000)).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod agents;
mod config;
mod error;
mod registry;
mod server;
pub mod session;
mod wire;
mod ws;

// Crate-level exports - Agents
pub use agents::{Agent, AgentId, AgentKind, AgentRegistry};

// Crate-level exports - Configuration
pub use config::{PORT_VAR, ServerConfig, TURN_INTERVAL_VAR};

// Crate-level exports - Errors
pub use error::{ConfigError, Rejection};

// Crate-level exports - Sessions
pub use registry::SessionRegistry;
pub use session::{
    Envelope, FallbackStrategy, Phase, SessionEvent, SessionHandle, SessionId, SessionSettings,
    SessionSummary,
};

// Crate-level exports - Transport
pub use server::{
    AppState, JoinRequest, JoinResponse, NewGameResponse, RegisterRequest, RegisterResponse,
    SubmitRequest, SubmitResponse, router,
};
pub use wire::{ClientMessage, ServerMessage};
