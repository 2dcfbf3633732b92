//! Transport abstraction layer for demoscope.
//!
//! Provides the [`Connector`] and [`Connection`] traits that the session
//! layer drives, independent of the concrete socket. The viewer is always
//! the dialing side: it opens one persistent connection per replay
//! session and reads frames until the server closes it.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket client via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// How a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer sent a close frame. `code` and `reason` are what it sent
    /// (1005 / empty when the frame carried no payload).
    Clean { code: u16, reason: String },
    /// The stream ended without a close handshake.
    Abnormal,
}

impl CloseReason {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean { .. })
    }
}

/// One inbound event from a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Binary(Vec<u8>),
    Text(String),
    /// The connection is finished; no further frames will arrive.
    Closed(CloseReason),
}

/// Opens connections.
///
/// Methods return `impl Future + Send` (rather than `async fn`) so the
/// session layer can drive a connection from a spawned task.
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;

    /// Dials `url` and completes the protocol handshake.
    fn connect(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// A single connection that can send bytes and yield inbound frames.
pub trait Connection: Send + Sync + 'static {
    /// Sends a binary frame to the remote peer.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Waits for the next inbound frame.
    ///
    /// Returns [`InboundFrame::Closed`] exactly once, after which callers
    /// must stop reading.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<InboundFrame, TransportError>> + Send;

    /// Closes the connection.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
