//! Session lookup by id.

use crate::error::Rejection;
use crate::session::{SessionHandle, SessionId, SessionSettings, SessionSummary};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// All live sessions, keyed by id.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
    next: Arc<AtomicU64>,
    settings: SessionSettings,
}

impl SessionRegistry {
    /// Creates an empty registry. New sessions use `settings`.
    #[instrument]
    pub fn new(settings: SessionSettings) -> Self {
        info!("Creating session registry");
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next: Arc::new(AtomicU64::new(1)),
            settings,
        }
    }

    /// Settings applied to new sessions.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Creates and starts a new session with a fresh unique id.
    #[instrument(skip(self))]
    pub async fn create_session(&self) -> SessionHandle {
        let id = self.next_id();
        let handle = SessionHandle::spawn(id.clone(), &self.settings);
        self.sessions.write().await.insert(id.clone(), handle.clone());
        info!(session_id = %id, "Created new session");
        handle
    }

    /// Registers an already running session.
    #[instrument(skip(self, handle), fields(session_id = %handle.id()))]
    pub async fn insert(&self, handle: SessionHandle) {
        self.sessions.write().await.insert(handle.id().clone(), handle);
        debug!("Session registered");
    }

    /// Looks up a session.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<SessionHandle, Rejection> {
        self.sessions.read().await.get(id).cloned().ok_or_else(|| {
            warn!(session_id = id, "Session not found");
            Rejection::SessionNotFound(id.to_string())
        })
    }

    /// Lists every session, oldest id first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Vec<SessionSummary> {
        let handles: Vec<SessionHandle> = self.sessions.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.summary().await {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!(session_id = %handle.id(), error = %e, "Skipping unreachable session"),
            }
        }
        summaries.sort_by_key(|s| sequence_of(&s.id));

        debug!(count = summaries.len(), "Listed sessions");
        summaries
    }

    fn next_id(&self) -> SessionId {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        format!("game_{}_{}", chrono::Utc::now().timestamp_millis(), seq)
    }
}

fn sequence_of(id: &str) -> u64 {
    id.rsplit('_')
        .next()
        .and_then(|seq| seq.parse().ok())
        .unwrap_or(u64::MAX)
}
