//! Codec trait and implementations.
//!
//! A codec turns inbound bytes into a [`Message`] and an
//! [`OutboundMessage`] into bytes. The transport adapter holds one codec
//! for binary frames ([`ProtobufCodec`]) and one for the degraded text
//! path ([`JsonCodec`]).

use crate::wire;
use crate::{Message, OutboundMessage, ProtocolError};

/// Converts between raw frames and messages.
///
/// `Send + Sync + 'static` because the codec lives inside the adapter's
/// read-loop task for the whole session.
pub trait Codec: Send + Sync + 'static {
    /// Serializes an outbound control message.
    ///
    /// # Errors
    /// Only text codecs can fail here; [`ProtobufCodec`] never does.
    fn encode(&self, msg: &OutboundMessage) -> Result<Vec<u8>, ProtocolError>;

    /// Parses one frame.
    ///
    /// # Errors
    /// [`ProtocolError::Empty`] for a zero-length frame, a malformed or
    /// unknown-type error otherwise. All are drop-and-continue.
    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError>;
}

// ---------------------------------------------------------------------------
// ProtobufCodec
// ---------------------------------------------------------------------------

/// The codec the replay server speaks: protobuf via `prost`.
///
/// ```rust
/// use demoscope_protocol::{Codec, OutboundMessage, ProtobufCodec, ReplayTarget};
///
/// let codec = ProtobufCodec;
/// let target = ReplayTarget::upload("match-1").unwrap();
/// let bytes = codec.encode(&OutboundMessage::PlayRequest(target)).unwrap();
/// assert!(!bytes.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec;

impl Codec for ProtobufCodec {
    fn encode(&self, msg: &OutboundMessage) -> Result<Vec<u8>, ProtocolError> {
        let frame = wire::Message::from(msg);
        Ok(prost::Message::encode_to_vec(&frame))
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        // prost happily decodes zero bytes into an all-default frame.
        if data.is_empty() {
            return Err(ProtocolError::Empty);
        }
        let frame = <wire::Message as prost::Message>::decode(data)
            .map_err(ProtocolError::Malformed)?;
        Message::try_from(frame)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// Parses JSON-shaped frames with the wire schema's camelCase names.
///
/// The replay server only sends binary frames. This exists for the text
/// frame fallback, which is kept for compatibility rather than because
/// anything is known to rely on it.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, msg: &OutboundMessage) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(&wire::Message::from(msg)).map_err(ProtocolError::Json)
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        if data.is_empty() {
            return Err(ProtocolError::Empty);
        }
        let frame: wire::Message =
            serde_json::from_slice(data).map_err(ProtocolError::Json)?;
        Message::try_from(frame)
    }
}
