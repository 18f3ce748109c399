//! MindMatrix - game server binary.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use mindmatrix_server::{AgentRegistry, AppState, ServerConfig, SessionRegistry, router};
use std::path::PathBuf;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
    }
}

/// Run the HTTP and WebSocket game server
#[instrument(skip_all)]
async fn run_server(config: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mindmatrix_server=debug")),
        )
        .init();

    let config = ServerConfig::load(config.as_deref())?.with_bind(host, port);
    info!(
        host = %config.host(),
        port = config.port(),
        turn_interval_secs = config.turn_interval_secs(),
        fallback = %config.fallback(),
        "Starting MindMatrix server"
    );

    let sessions = SessionRegistry::new(config.session_settings());
    if *config.create_default_game() {
        let handle = sessions.create_session().await;
        info!(session_id = %handle.id(), "Default game created");
    }

    let app = router(AppState::new(sessions, AgentRegistry::new()));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
