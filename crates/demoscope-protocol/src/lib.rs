//! Wire protocol for demoscope.
//!
//! This crate defines what travels between the replay server and the
//! viewer:
//!
//! - **Wire schema** ([`wire`]) — the protobuf structures exactly as they
//!   appear on the socket, decoded with `prost`.
//! - **Messages** ([`Message`], [`MessageType`], [`OutboundMessage`]) —
//!   the tagged union the rest of the viewer works with. Exactly one
//!   payload is meaningful per variant.
//! - **Codecs** ([`Codec`], [`ProtobufCodec`], [`JsonCodec`]) — bytes to
//!   messages and back.
//!
//! ```text
//! Transport (frames) → Protocol (Message) → Bus (fan-out) → Reducers
//! ```

mod codec;
mod error;
mod types;
pub mod wire;

pub use codec::{Codec, ProtobufCodec};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Message, OutboundMessage, ReplayTarget, Team};
pub use wire::{
    Bomb, DemoPlatform, Frag, Grenade, Init, MessageType, Player, Progress,
    Round, RoundTime, Shot, TeamUpdate, TickState,
};
