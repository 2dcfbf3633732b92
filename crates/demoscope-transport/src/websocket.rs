//! WebSocket client implementation using `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::error::ProtocolError as WsProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::{
    CloseReason, Connection, ConnectionId, Connector, InboundFrame,
    TransportError,
};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Close code reported when a close frame carries no payload (RFC 6455).
const NO_STATUS_RECEIVED: u16 = 1005;

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A [`Connector`] that dials `ws://` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    type Connection = WebSocketConnection;

    async fn connect(&self, url: &str) -> Result<Self::Connection, TransportError> {
        let (ws, _response) =
            tokio_tungstenite::connect_async(url).await.map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;

        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        tracing::debug!(%id, url, "WebSocket connection established");

        // Split so a pending `recv` never blocks a `send`.
        let (sink, stream) = ws.split();
        Ok(WebSocketConnection {
            id,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }
}

/// A single client-side WebSocket connection.
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl Connection for WebSocketConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        let msg = Message::Binary(data.to_vec().into());
        self.sink.lock().await.send(msg).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    async fn recv(&self) -> Result<InboundFrame, TransportError> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Binary(data))) => {
                    return Ok(InboundFrame::Binary(data.into()));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(InboundFrame::Text(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = match frame {
                        Some(f) => (u16::from(f.code), f.reason.as_str().to_owned()),
                        None => (NO_STATUS_RECEIVED, String::new()),
                    };
                    return Ok(InboundFrame::Closed(CloseReason::Clean {
                        code,
                        reason,
                    }));
                }
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(WsError::Protocol(
                    WsProtocolError::ResetWithoutClosingHandshake,
                )))
                | None => {
                    return Ok(InboundFrame::Closed(CloseReason::Abnormal));
                }
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.sink
            .lock()
            .await
            .send(Message::Close(None))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    e,
                ))
            })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
