//! Command-line interface for mindmatrix.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MindMatrix - authoritative server for a simultaneous-turn tactics game
#[derive(Parser, Debug)]
#[command(name = "mindmatrix")]
#[command(about = "Game server for agents and humans playing MindMatrix", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP and WebSocket game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to, overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to, overrides the config file and PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
}
