//! Error types for the protocol layer.
//!
//! Every variant here is recoverable: a frame that fails to decode is
//! logged and dropped by the caller, and the session keeps listening.

/// Errors that can occur while decoding inbound frames or building
/// outbound ones.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The frame had zero bytes. A zero-length protobuf buffer would
    /// otherwise decode to an all-default message, so it is rejected
    /// explicitly.
    #[error("empty frame")]
    Empty,

    /// The bytes are not a valid protobuf `Message`.
    #[error("malformed frame: {0}")]
    Malformed(#[source] prost::DecodeError),

    /// The discriminant does not name any known message type.
    #[error("unknown message type {0}")]
    UnknownMessageType(i32),

    /// A text frame could not be parsed as a JSON-shaped message, or a
    /// message could not be rendered as JSON.
    #[cfg(feature = "json")]
    #[error("json frame: {0}")]
    Json(#[source] serde_json::Error),

    /// The message is invalid at the protocol level, e.g. a play request
    /// without a match identifier.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
