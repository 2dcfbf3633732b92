/// Errors that can occur in the transport layer.
///
/// Any of these is terminal for the session that hit it; there is no
/// automatic reconnect.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// The connection was already closed when an operation was attempted.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
