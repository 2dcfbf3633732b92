//! Session types: configuration and the per-replay bundle.
//!
//! A "session" is everything one replay needs while it plays:
//! - a fresh [`EventBus`]
//! - a fresh [`World`] attached to it
//! - a [`TransportAdapter`] task feeding the bus
//!
//! Nothing is shared between sessions. Restarting means ending the old
//! session (which empties its bus) and starting a new one, so the new
//! world begins empty because it *is* new.

use std::fmt;
use std::sync::Arc;

use demoscope_bus::{ALERT_TAG, EventBus, HandlerError};
use demoscope_protocol::{DemoPlatform, Message, ReplayTarget};
use demoscope_transport::Connector;
use demoscope_world::{World, WorldSnapshot};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::{AlertSink, ConnectionState, SessionError, TransportAdapter};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Server URL used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8080/ws";

/// Where to connect and which platform replay ids belong to.
///
/// `Default` gives a local development server and uploaded demos. Use
/// [`SessionConfig::from_env`] to pick values up from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// WebSocket URL of the replay server.
    pub server_url: String,

    /// Platform sent with every play request.
    pub platform: DemoPlatform,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            platform: DemoPlatform::Upload,
        }
    }
}

impl SessionConfig {
    /// Reads `DEMOSCOPE_SERVER_URL` and `DEMOSCOPE_PLATFORM`, falling back
    /// to the defaults for whichever is unset.
    ///
    /// # Errors
    /// [`SessionError::InvalidConfig`] if `DEMOSCOPE_PLATFORM` is set to
    /// something other than `upload`, `steam` or `faceit`.
    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SessionError> {
        let mut config = Self::default();
        if let Some(url) = lookup("DEMOSCOPE_SERVER_URL").filter(|u| !u.trim().is_empty()) {
            config.server_url = url;
        }
        if let Some(name) = lookup("DEMOSCOPE_PLATFORM") {
            config.platform = parse_platform(&name)?;
        }
        Ok(config)
    }
}

/// Parses a platform name, case-insensitively.
pub fn parse_platform(name: &str) -> Result<DemoPlatform, SessionError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "upload" => Ok(DemoPlatform::Upload),
        "steam" => Ok(DemoPlatform::Steam),
        "faceit" => Ok(DemoPlatform::Faceit),
        other => Err(SessionError::InvalidConfig(format!(
            "unknown platform {other:?}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Identifies one session for the lifetime of its manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One running replay.
///
/// Dropping a session tears it down the same way [`Session::end`] does,
/// except that it doesn't wait for the transport task to finish.
pub struct Session {
    id: SessionId,
    target: ReplayTarget,
    bus: EventBus,
    world: World,
    state: watch::Receiver<ConnectionState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<ConnectionState>>,
}

impl Session {
    /// Builds a new bus and world, wires alerts to `alerts`, and spawns
    /// the transport task.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn start<K: Connector>(
        id: SessionId,
        connector: Arc<K>,
        server_url: String,
        target: ReplayTarget,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        let bus = EventBus::new();
        let world = World::new();
        world.attach(&bus);
        bus.subscribe(&[ALERT_TAG], move |msg: &Message| -> Result<(), HandlerError> {
            if let Message::Alert(text) = msg {
                alerts.notify(text);
            }
            Ok(())
        });

        let (adapter, state) = TransportAdapter::new(bus.clone(), target.clone());
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            adapter.run(connector.as_ref(), &server_url, shutdown_rx).await
        });

        tracing::info!(session_id = %id, replay = %target, "session started");
        Self {
            id,
            target,
            bus,
            world,
            state,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn target(&self) -> &ReplayTarget {
        &self.target
    }

    /// The session's bus. Extra subscribers added here are dropped with
    /// everything else when the session ends.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// A receiver that observes every connection state change.
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Waits until the connection reaches `Closed` or `Errored`.
    pub async fn terminated(&self) -> ConnectionState {
        let mut rx = self.state.clone();
        let reached = rx.wait_for(|s| s.is_terminal()).await.map(|s| *s);
        match reached {
            Ok(state) => state,
            // The adapter is gone; whatever it last reported is final.
            Err(_) => *rx.borrow(),
        }
    }

    /// Drops every subscription, stops the transport task, and waits for
    /// it to close the connection.
    pub async fn end(mut self) {
        self.teardown();
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(state) => tracing::debug!(session_id = %self.id, ?state, "transport task finished"),
                Err(error) => tracing::warn!(session_id = %self.id, %error, "transport task failed"),
            }
        }
    }

    fn teardown(&mut self) {
        let Some(shutdown) = self.shutdown.take() else {
            return;
        };
        // Waits out a delivery the task may be running right now. After
        // this no handler of this session is reachable, even if the task
        // publishes one more frame before it sees the shutdown.
        self.bus.clear();
        let _ = shutdown.send(());
        tracing::info!(session_id = %self.id, "session ended");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.server_url, "ws://localhost:8080/ws");
        assert_eq!(config.platform, DemoPlatform::Upload);
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("DEMOSCOPE_SERVER_URL", "wss://replays.example/ws"),
            ("DEMOSCOPE_PLATFORM", "Steam"),
        ]))
        .unwrap();
        assert_eq!(config.server_url, "wss://replays.example/ws");
        assert_eq!(config.platform, DemoPlatform::Steam);
    }

    #[test]
    fn test_config_blank_url_keeps_default() {
        let config =
            SessionConfig::from_lookup(lookup(&[("DEMOSCOPE_SERVER_URL", "  ")])).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_config_unknown_platform_is_rejected() {
        let result = SessionConfig::from_lookup(lookup(&[("DEMOSCOPE_PLATFORM", "esea")]));
        assert!(matches!(result, Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_platform_names() {
        assert_eq!(parse_platform("faceit").unwrap(), DemoPlatform::Faceit);
        assert_eq!(parse_platform(" UPLOAD ").unwrap(), DemoPlatform::Upload);
    }

    #[test]
    fn test_session_id_display() {
        assert_eq!(SessionId(3).to_string(), "session-3");
    }
}
