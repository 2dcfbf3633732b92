//! `Viewer` builder and the control surface the presentation layer uses.
//!
//! This is the entry point for embedding demoscope. It ties together all
//! the layers: transport → protocol → bus → world → session.

use std::sync::Arc;
use std::time::Instant;

use demoscope_protocol::DemoPlatform;
use demoscope_session::{
    AlertSink, ConnectionState, LogAlertSink, SessionConfig, SessionId, SessionManager,
};
use demoscope_transport::{Connector, WebSocketConnector};
use demoscope_world::{ExpiryQueue, Lifetimes, SlotList, Store, WorldSnapshot};
use tokio::sync::Mutex;

use crate::DemoscopeError;

// ---------------------------------------------------------------------------
// ViewerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring a [`Viewer`].
///
/// # Example
///
/// ```rust,no_run
/// use demoscope::prelude::*;
///
/// # async fn run() -> Result<(), DemoscopeError> {
/// let viewer = Viewer::builder()
///     .server_url("ws://replays.local:8080/ws")
///     .platform(DemoPlatform::Upload)
///     .alert_sink(|text: &str| eprintln!("!! {text}"))
///     .build();
///
/// viewer.select_replay("2f1c9a").await?;
/// let world = viewer.snapshot().await;
/// println!("map: {}", world.map.asset_key());
/// # Ok(())
/// # }
/// ```
pub struct ViewerBuilder {
    config: SessionConfig,
    alerts: Arc<dyn AlertSink>,
    lifetimes: Lifetimes,
}

impl ViewerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            alerts: Arc::new(LogAlertSink),
            lifetimes: Lifetimes::default(),
        }
    }

    /// Replaces the whole session configuration, e.g. with
    /// [`SessionConfig::from_env`].
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the replay server's WebSocket URL.
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = url.into();
        self
    }

    /// Sets the platform sent with every play request.
    pub fn platform(mut self, platform: DemoPlatform) -> Self {
        self.config.platform = platform;
        self
    }

    /// Where alerts go. Defaults to [`LogAlertSink`].
    pub fn alert_sink(mut self, sink: impl AlertSink) -> Self {
        self.alerts = Arc::new(sink);
        self
    }

    /// How long shots, explosions and kills stay visible.
    pub fn lifetimes(mut self, lifetimes: Lifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    /// Builds a viewer that connects over WebSocket.
    pub fn build(self) -> Viewer<WebSocketConnector> {
        self.build_with(WebSocketConnector)
    }

    /// Builds a viewer on a custom connector.
    pub fn build_with<K: Connector>(self, connector: K) -> Viewer<K> {
        tracing::debug!(server_url = %self.config.server_url, platform = ?self.config.platform, "viewer built");
        Viewer {
            lifetimes: self.lifetimes,
            inner: Mutex::new(Inner {
                sessions: SessionManager::new(connector, self.config, self.alerts),
                expiry: Expiry::new(self.lifetimes),
            }),
        }
    }
}

impl Default for ViewerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Viewer
// ---------------------------------------------------------------------------

/// Expiry queues for the active session's ephemeral lists.
struct Expiry {
    shots: ExpiryQueue,
    explosions: ExpiryQueue,
    kills: ExpiryQueue,
}

impl Expiry {
    fn new(lifetimes: Lifetimes) -> Self {
        Self {
            shots: ExpiryQueue::new(lifetimes.shot),
            explosions: ExpiryQueue::new(lifetimes.explosion),
            kills: ExpiryQueue::new(lifetimes.kill),
        }
    }
}

struct Inner<K: Connector> {
    sessions: SessionManager<K>,
    expiry: Expiry,
}

/// A replay viewer: at most one live session plus the controls the
/// presentation layer needs.
///
/// All methods take `&self`, so a `Viewer` can sit in an `Arc` shared
/// between the UI and a render loop.
pub struct Viewer<K: Connector = WebSocketConnector> {
    lifetimes: Lifetimes,
    inner: Mutex<Inner<K>>,
}

impl Viewer<WebSocketConnector> {
    /// Creates a new builder.
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }
}

impl<K: Connector> Viewer<K> {
    /// Ends the current session, if any, and starts one for `match_id`.
    ///
    /// # Errors
    /// Fails without touching the current session if `match_id` is blank.
    pub async fn select_replay(&self, match_id: &str) -> Result<SessionId, DemoscopeError> {
        let mut inner = self.inner.lock().await;
        let id = inner.sessions.select_replay(match_id).await?;
        inner.expiry = Expiry::new(self.lifetimes);
        Ok(id)
    }

    /// Ends the current session and leaves none running.
    pub async fn reset_session(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.expiry = Expiry::new(self.lifetimes);
        inner.sessions.reset_session().await
    }

    /// A copy of the current world; the empty world when no session runs.
    pub async fn snapshot(&self) -> WorldSnapshot {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .active()
            .map(|s| s.snapshot())
            .unwrap_or_default()
    }

    /// The active session's connection state; `Idle` when none runs.
    pub async fn connection_state(&self) -> ConnectionState {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .active()
            .map_or(ConnectionState::Idle, |s| s.state())
    }

    pub async fn session_id(&self) -> Option<SessionId> {
        self.inner.lock().await.sessions.active().map(|s| s.id())
    }

    /// Tombstones shot `index`. Returns whether a live shot was removed.
    pub async fn remove_shot(&self, index: usize) -> bool {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .active()
            .is_some_and(|s| s.world().shots.update(|shots| shots.remove(index)))
    }

    pub async fn remove_explosion(&self, index: usize) -> bool {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .active()
            .is_some_and(|s| s.world().explosions.update(|e| e.remove(index)))
    }

    pub async fn remove_kill(&self, index: usize) -> bool {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .active()
            .is_some_and(|s| s.world().kill_feed.update(|k| k.remove(index)))
    }

    /// Removes every shot, explosion and kill whose lifetime ran out by
    /// `now`. Call once per rendered frame. Returns how many were removed.
    pub async fn expire(&self, now: Instant) -> usize {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let Some(session) = inner.sessions.active() else {
            return 0;
        };
        let world = session.world();
        let expiry = &mut inner.expiry;

        let removed = expire_list(&world.shots, &mut expiry.shots, now, |s| &mut s.list)
            + expire_list(&world.explosions, &mut expiry.explosions, now, |e| &mut e.list)
            + expire_list(&world.kill_feed, &mut expiry.kills, now, |k| &mut k.list);
        if removed > 0 {
            tracing::trace!(removed, "expired ephemeral entries");
        }
        removed
    }
}

/// Schedules new slots and tombstones due ones under a single lock, so a
/// clear in between can't redirect a removal to the wrong entry.
fn expire_list<R, T>(
    store: &Store<R>,
    queue: &mut ExpiryQueue,
    now: Instant,
    list: impl FnOnce(&mut R) -> &mut SlotList<T>,
) -> usize
where
    R: demoscope_world::Reducer,
{
    store.update(|state| {
        let list = list(state);
        queue.observe(list, now);
        queue
            .due(now)
            .into_iter()
            .filter(|&i| list.remove(i).is_some())
            .count()
    })
}
