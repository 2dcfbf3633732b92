//! The session manager: owns at most one active session.
//!
//! ```text
//! select_replay("m1") ──→ [session-1] ──select_replay("m2")──→ [session-2]
//!                              │                                    │
//!                              ▼ end()                              ▼ reset_session()
//!                           (gone)                               (none active)
//! ```
//!
//! Starting a session always ends the previous one first. There is never
//! a moment where two sessions' handlers are registered, and no state
//! carries over from one to the next.
//!
//! # Concurrency note
//!
//! `SessionManager` takes `&mut self` for every transition. Callers that
//! share it across tasks wrap it in a mutex one level up, as the
//! `Viewer` does.

use std::sync::Arc;

use demoscope_protocol::ReplayTarget;
use demoscope_transport::Connector;

use crate::{AlertSink, Session, SessionConfig, SessionError, SessionId};

/// Starts and ends replay sessions against one connector.
pub struct SessionManager<K: Connector> {
    connector: Arc<K>,
    config: SessionConfig,
    alerts: Arc<dyn AlertSink>,
    active: Option<Session>,
    next_id: u64,
}

impl<K: Connector> SessionManager<K> {
    pub fn new(connector: K, config: SessionConfig, alerts: Arc<dyn AlertSink>) -> Self {
        Self {
            connector: Arc::new(connector),
            config,
            alerts,
            active: None,
            next_id: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The running session, if any.
    pub fn active(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    /// Ends the active session (waiting for its connection to close) and
    /// starts a new one for `target`.
    pub async fn start_session(&mut self, target: ReplayTarget) -> SessionId {
        if let Some(previous) = self.active.take() {
            previous.end().await;
        }

        self.next_id += 1;
        let id = SessionId(self.next_id);
        let session = Session::start(
            id,
            Arc::clone(&self.connector),
            self.config.server_url.clone(),
            target,
            Arc::clone(&self.alerts),
        );
        self.active = Some(session);
        id
    }

    /// Ends session `id`.
    ///
    /// # Errors
    /// [`SessionError::NoActiveSession`] if `id` is not the active session
    /// (it was already ended or replaced).
    pub async fn end_session(&mut self, id: SessionId) -> Result<(), SessionError> {
        let session = self
            .active
            .take_if(|s| s.id() == id)
            .ok_or(SessionError::NoActiveSession)?;
        session.end().await;
        Ok(())
    }

    /// Validates `match_id` against the configured platform, then replaces
    /// the active session with one for it.
    ///
    /// # Errors
    /// [`SessionError::InvalidTarget`] for a blank id. The active session
    /// is left running in that case.
    pub async fn select_replay(&mut self, match_id: &str) -> Result<SessionId, SessionError> {
        let target = ReplayTarget::new(match_id, self.config.platform)
            .map_err(SessionError::InvalidTarget)?;
        Ok(self.start_session(target).await)
    }

    /// Ends the active session and leaves none running. Returns whether
    /// there was one.
    pub async fn reset_session(&mut self) -> bool {
        match self.active.take() {
            Some(session) => {
                session.end().await;
                true
            }
            None => false,
        }
    }
}
