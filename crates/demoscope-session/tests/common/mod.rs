//! In-memory connector for session tests.
//!
//! Every `connect` call creates a pair of channels and hands the far end
//! to the test as a [`Remote`], so a test plays the replay server.

#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use demoscope_protocol::{Message, wire};
use demoscope_transport::{
    CloseReason, Connection, ConnectionId, Connector, InboundFrame, TransportError,
};
use tokio::sync::{Mutex, mpsc};

pub type Frame = Result<InboundFrame, TransportError>;

// =========================================================================
// Connector
// =========================================================================

pub struct MockConnector {
    remotes: mpsc::UnboundedSender<Remote>,
    refuse: AtomicBool,
    next_id: AtomicU64,
}

impl MockConnector {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Remote>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Self {
            remotes: tx,
            refuse: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        };
        (connector, rx)
    }

    /// A connector whose every dial fails.
    pub fn refusing() -> Self {
        let (connector, _rx) = Self::new();
        connector.refuse.store(true, Ordering::SeqCst);
        connector
    }
}

impl Connector for MockConnector {
    type Connection = MockConnection;

    async fn connect(&self, _url: &str) -> Result<MockConnection, TransportError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            )));
        }
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));

        let remote = Remote {
            frames: frames_tx,
            sent: sent_rx,
            closed: Arc::clone(&closed),
        };
        self.remotes
            .send(remote)
            .map_err(|_| TransportError::ConnectionClosed("test dropped remotes".into()))?;

        Ok(MockConnection {
            id,
            frames: Mutex::new(frames_rx),
            sent: sent_tx,
            closed,
        })
    }
}

// =========================================================================
// Connection
// =========================================================================

pub struct MockConnection {
    id: ConnectionId,
    frames: Mutex<mpsc::UnboundedReceiver<Frame>>,
    sent: mpsc::UnboundedSender<Vec<u8>>,
    closed: Arc<AtomicBool>,
}

impl Connection for MockConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        self.sent
            .send(data.to_vec())
            .map_err(|_| TransportError::ConnectionClosed("remote gone".into()))
    }

    async fn recv(&self) -> Result<InboundFrame, TransportError> {
        match self.frames.lock().await.recv().await {
            Some(frame) => frame,
            // Remote dropped without saying goodbye.
            None => Ok(InboundFrame::Closed(CloseReason::Abnormal)),
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

// =========================================================================
// Remote (the test's side)
// =========================================================================

pub struct Remote {
    pub frames: mpsc::UnboundedSender<Frame>,
    pub sent: mpsc::UnboundedReceiver<Vec<u8>>,
    pub closed: Arc<AtomicBool>,
}

impl Remote {
    /// Sends `msg` as a protobuf binary frame.
    pub fn push(&self, msg: Message) {
        let bytes = prost::Message::encode_to_vec(&wire::Message::from(msg));
        self.push_raw(bytes);
    }

    pub fn push_raw(&self, bytes: Vec<u8>) {
        self.frames.send(Ok(InboundFrame::Binary(bytes))).unwrap();
    }

    pub fn push_text(&self, text: &str) {
        self.frames.send(Ok(InboundFrame::Text(text.into()))).unwrap();
    }

    pub fn close(&self, code: u16, reason: &str) {
        self.frames
            .send(Ok(InboundFrame::Closed(CloseReason::Clean {
                code,
                reason: reason.into(),
            })))
            .unwrap();
    }

    pub fn fail(&self) {
        self.frames
            .send(Err(TransportError::ReceiveFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset by peer",
            ))))
            .unwrap();
    }

    /// The next frame the client sent, decoded.
    pub async fn next_sent(&mut self) -> wire::Message {
        let bytes = within(self.sent.recv()).await.expect("client sent nothing");
        <wire::Message as prost::Message>::decode(bytes.as_slice()).unwrap()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

// =========================================================================
// Timing helpers
// =========================================================================

/// Awaits `fut`, failing the test after two seconds.
pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .expect("timed out")
}

/// Polls `cond` until it holds, failing the test after two seconds.
pub async fn eventually(mut cond: impl FnMut() -> bool) {
    within(async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
}
