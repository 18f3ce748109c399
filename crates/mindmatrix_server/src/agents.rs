//! Registered agents.

use crate::error::Rejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// Unique identifier for a registered agent.
pub type AgentId = String;

/// Who is behind an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgentKind {
    /// A program.
    #[default]
    Ai,
    /// A person.
    Human,
}

/// A registered agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Agent id.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Agent kind.
    #[serde(rename = "type")]
    pub kind: AgentKind,
    /// When the agent registered.
    pub registered_at: DateTime<Utc>,
}

/// Every agent registered with this server.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: Arc<RwLock<HashMap<AgentId, Agent>>>,
    next: Arc<AtomicU64>,
}

impl AgentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new agent and returns its record.
    #[instrument(skip(self))]
    pub async fn register(&self, name: String, kind: AgentKind) -> Agent {
        let now = Utc::now();
        let seq = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        let agent = Agent {
            id: format!("agent_{}_{}", now.timestamp_millis(), seq),
            name,
            kind,
            registered_at: now,
        };

        self.agents.write().await.insert(agent.id.clone(), agent.clone());
        info!(agent_id = %agent.id, "Agent registered");
        agent
    }

    /// Looks up an agent.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Agent, Rejection> {
        self.agents.read().await.get(id).cloned().ok_or_else(|| {
            warn!(agent_id = id, "Unknown agent");
            Rejection::AgentNotRegistered(id.to_string())
        })
    }
}
