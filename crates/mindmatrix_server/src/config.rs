//! Server configuration.

use crate::error::ConfigError;
use crate::session::{FallbackStrategy, SessionSettings};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Environment variable overriding `port`.
pub const PORT_VAR: &str = "PORT";

/// Environment variable overriding `turn_interval_secs`.
pub const TURN_INTERVAL_VAR: &str = "MINDMATRIX_TURN_INTERVAL_SECS";

/// Configuration for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Seconds a live session waits for both batches before filling in.
    #[serde(default = "default_turn_interval_secs")]
    turn_interval_secs: u64,

    /// What the turn timer submits for a silent side.
    #[serde(default)]
    fallback: FallbackStrategy,

    /// Seed for fallback batches. Unset means seeded from the OS.
    #[serde(default)]
    rng_seed: Option<u64>,

    /// Capacity of each session's event channel.
    #[serde(default = "default_event_buffer")]
    event_buffer: usize,

    /// Whether to open one game at startup.
    #[serde(default = "default_create_default_game")]
    create_default_game: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_turn_interval_secs() -> u64 {
    20
}

fn default_event_buffer() -> usize {
    64
}

fn default_create_default_game() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            turn_interval_secs: default_turn_interval_secs(),
            fallback: FallbackStrategy::default(),
            rng_seed: None,
            event_buffer: default_event_buffer(),
            create_default_game: default_create_default_game(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        info!(port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if one is given, then applies environment overrides.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies `PORT` and `MINDMATRIX_TURN_INTERVAL_SECS` from `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = lookup(PORT_VAR) {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}: {}", PORT_VAR, e)))?;
            debug!(port = self.port, "Port overridden from environment");
        }
        if let Some(secs) = lookup(TURN_INTERVAL_VAR) {
            self.turn_interval_secs = secs
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}: {}", TURN_INTERVAL_VAR, e)))?;
            debug!(secs = self.turn_interval_secs, "Turn interval overridden from environment");
        }
        self.validate()
    }

    /// Overrides the bind address from the command line.
    pub fn with_bind(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Turn deadline as a duration.
    pub fn turn_interval(&self) -> Duration {
        Duration::from_secs(self.turn_interval_secs)
    }

    /// Settings handed to every new session.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            turn_interval: self.turn_interval(),
            fallback: self.fallback,
            rng_seed: self.rng_seed,
            event_buffer: self.event_buffer,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_interval_secs == 0 {
            warn!("Rejecting zero turn interval");
            return Err(ConfigError::new("turn_interval_secs must be at least 1"));
        }
        if self.event_buffer == 0 {
            return Err(ConfigError::new("event_buffer must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 3000);
        assert_eq!(config.turn_interval(), Duration::from_secs(20));
        assert_eq!(*config.fallback(), FallbackStrategy::Wander);
        assert!(*config.create_default_game());
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 4100\nfallback = \"idle\"\nrng_seed = 9").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.port(), 4100);
        assert_eq!(*config.fallback(), FallbackStrategy::Idle);
        assert_eq!(*config.rng_seed(), Some(9));
        assert_eq!(*config.turn_interval_secs(), 20);
        assert_eq!(config.host(), "127.0.0.1");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prot = 4100").unwrap();
        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::from_file("/nonexistent/mindmatrix.toml").unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides(|name| match name {
                PORT_VAR => Some("8080".into()),
                TURN_INTERVAL_VAR => Some("5".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.turn_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_bad_override_and_zero_interval() {
        let mut config = ServerConfig::default();
        assert!(config.apply_overrides(|_| Some("soon".into())).is_err());

        let mut config = ServerConfig::default();
        let err = config
            .apply_overrides(|name| (name == TURN_INTERVAL_VAR).then(|| "0".to_string()))
            .unwrap_err();
        assert!(err.message.contains("at least 1"));
    }

    #[test]
    fn test_cli_bind_wins() {
        let config = ServerConfig::default().with_bind(Some("0.0.0.0".into()), Some(9000));
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 9000);
    }
}
