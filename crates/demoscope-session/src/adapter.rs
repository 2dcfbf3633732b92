//! The transport adapter: one connection, decoded onto one bus.
//!
//! ```text
//!   Idle ──→ Connecting ──→ Open ──→ Closed
//!                │            │
//!                └────────────┴────→ Errored
//! ```
//!
//! The adapter dials the replay server, sends a single play request for
//! its target, then turns every inbound frame into a bus publish until
//! the connection ends. It never reconnects: a new connection means a
//! new session.

use demoscope_bus::EventBus;
use demoscope_protocol::{
    Codec, JsonCodec, Message, OutboundMessage, ProtobufCodec, ReplayTarget,
};
use demoscope_transport::{CloseReason, Connection, Connector, InboundFrame};
use tokio::sync::{oneshot, watch};

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// Where the adapter is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, not yet dialing.
    Idle,
    /// Dialing the server.
    Connecting,
    /// Play request sent; frames are flowing.
    Open,
    /// The connection ended, cleanly or not, or the session was ended.
    Closed,
    /// The connection failed. One alert has been published.
    Errored,
}

impl ConnectionState {
    /// `Closed` and `Errored` are final; nothing follows them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

// ---------------------------------------------------------------------------
// TransportAdapter
// ---------------------------------------------------------------------------

/// Owns the read loop for one connection.
///
/// Created together with a `watch` receiver through which anyone can
/// observe [`ConnectionState`] changes.
pub struct TransportAdapter {
    bus: EventBus,
    target: ReplayTarget,
    state: watch::Sender<ConnectionState>,
}

impl TransportAdapter {
    pub fn new(bus: EventBus, target: ReplayTarget) -> (Self, watch::Receiver<ConnectionState>) {
        let (state, rx) = watch::channel(ConnectionState::Idle);
        (Self { bus, target, state }, rx)
    }

    /// Connects to `url` and pumps frames onto the bus until the
    /// connection ends or `shutdown` fires (or its sender is dropped).
    ///
    /// Returns the terminal state.
    pub async fn run<K: Connector>(
        self,
        connector: &K,
        url: &str,
        mut shutdown: oneshot::Receiver<()>,
    ) -> ConnectionState {
        self.transition(ConnectionState::Connecting);

        let conn = tokio::select! {
            result = connector.connect(url) => match result {
                Ok(conn) => conn,
                Err(error) => return self.fail(&error),
            },
            _ = &mut shutdown => {
                tracing::debug!(%url, "session ended while connecting");
                return self.transition(ConnectionState::Closed);
            }
        };

        self.transition(ConnectionState::Open);

        // Exactly one play request, before anything is read.
        let request = OutboundMessage::PlayRequest(self.target.clone());
        let sent = match ProtobufCodec.encode(&request) {
            Ok(bytes) => conn.send(&bytes).await,
            Err(error) => return self.fail(&error),
        };
        if let Err(error) = sent {
            return self.fail(&error);
        }
        tracing::info!(conn = %conn.id(), %url, replay = %self.target, "play request sent");

        loop {
            let frame = tokio::select! {
                frame = conn.recv() => frame,
                _ = &mut shutdown => {
                    if let Err(error) = conn.close().await {
                        tracing::debug!(conn = %conn.id(), %error, "close on shutdown failed");
                    }
                    tracing::info!(conn = %conn.id(), "connection closed by session end");
                    return self.transition(ConnectionState::Closed);
                }
            };

            match frame {
                Ok(InboundFrame::Binary(bytes)) => self.on_binary(&bytes),
                Ok(InboundFrame::Text(text)) => self.on_text(&text),
                Ok(InboundFrame::Closed(reason)) => {
                    match &reason {
                        CloseReason::Clean { code, reason } => {
                            tracing::info!(conn = %conn.id(), code, %reason, "connection closed");
                        }
                        CloseReason::Abnormal => {
                            tracing::warn!(conn = %conn.id(), "connection dropped without close frame");
                        }
                    }
                    return self.transition(ConnectionState::Closed);
                }
                Err(error) => return self.fail(&error),
            }
        }
    }

    fn on_binary(&self, bytes: &[u8]) {
        match ProtobufCodec.decode(bytes) {
            Ok(msg) => self.bus.publish(msg),
            Err(error) => {
                tracing::debug!(len = bytes.len(), %error, "dropping undecodable frame");
            }
        }
    }

    /// The server only sends binary frames; a text frame is parsed as
    /// JSON on a best-effort basis.
    fn on_text(&self, text: &str) {
        tracing::warn!(len = text.len(), "unexpected text frame, trying JSON");
        match JsonCodec.decode(text.as_bytes()) {
            Ok(msg) => self.bus.publish(msg),
            Err(error) => tracing::debug!(%error, "dropping unparsable text frame"),
        }
    }

    /// Publishes the session's one alert, then moves to `Errored`.
    fn fail(&self, error: &dyn std::error::Error) -> ConnectionState {
        tracing::error!(replay = %self.target, %error, "connection failed");
        self.bus
            .publish(Message::Alert(format!("Connection to replay server failed: {error}")));
        self.transition(ConnectionState::Errored)
    }

    fn transition(&self, next: ConnectionState) -> ConnectionState {
        let prev = self.state.send_replace(next);
        tracing::debug!(from = ?prev, to = ?next, "connection state");
        next
    }
}
