//! The message union the viewer works with.
//!
//! The wire format is a flat struct with one optional field per payload
//! kind. That shape allows frames where the discriminant says "tick" but
//! a shot payload is also present. [`Message`] removes that ambiguity:
//! one variant per [`MessageType`], each carrying only its own payload.

use std::fmt;

use crate::wire::{self, DemoPlatform, MessageType};
use crate::{
    Frag, Grenade, Init, Progress, ProtocolError, Round, RoundTime, Shot,
    TeamUpdate, TickState,
};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A decoded inbound frame.
///
/// Constructed by a [`Codec`](crate::Codec) on receipt, published once on
/// the event bus, then dropped. Payload-less variants (`DemoEnd`,
/// `PlayChange`, `Empty`) still carry their discriminant through
/// [`Message::tag`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Empty,
    TickState(TickState),
    Round(Round),
    TeamUpdate(TeamUpdate),
    Init(Init),
    RoundTime(RoundTime),
    Frag(Frag),
    DemoEnd,
    Progress(Progress),
    Shot(Shot),
    /// A play request echoed back by the server. The viewer never acts
    /// on these, but they are part of the union.
    PlayRequest(wire::Demo),
    /// The replay moved to another round or phase.
    PlayChange,
    /// The reserved alert tag: text to surface to the user.
    Alert(String),
    GrenadeEvent(Grenade),
}

impl Message {
    /// The discriminant this message is routed by.
    pub fn tag(&self) -> MessageType {
        match self {
            Self::Empty => MessageType::Empty,
            Self::TickState(_) => MessageType::TickStateUpdate,
            Self::Round(_) => MessageType::Round,
            Self::TeamUpdate(_) => MessageType::TeamUpdate,
            Self::Init(_) => MessageType::Init,
            Self::RoundTime(_) => MessageType::RoundTime,
            Self::Frag(_) => MessageType::Frag,
            Self::DemoEnd => MessageType::DemoEnd,
            Self::Progress(_) => MessageType::Progress,
            Self::Shot(_) => MessageType::Shot,
            Self::PlayRequest(_) => MessageType::PlayRequest,
            Self::PlayChange => MessageType::PlayChange,
            Self::Alert(_) => MessageType::Error,
            Self::GrenadeEvent(_) => MessageType::GrenadeEvent,
        }
    }
}

/// Reads only the payload that belongs to the discriminant. A known
/// discriminant with a missing payload yields that payload's default,
/// so the tag is never lost.
impl TryFrom<wire::Message> for Message {
    type Error = ProtocolError;

    fn try_from(frame: wire::Message) -> Result<Self, Self::Error> {
        let tag = MessageType::try_from(frame.msg_type)
            .map_err(|_| ProtocolError::UnknownMessageType(frame.msg_type))?;

        Ok(match tag {
            MessageType::Empty => Self::Empty,
            MessageType::TickStateUpdate => {
                Self::TickState(frame.tick_state.unwrap_or_default())
            }
            MessageType::Round => Self::Round(frame.round.unwrap_or_default()),
            MessageType::TeamUpdate => {
                Self::TeamUpdate(frame.team_update.unwrap_or_default())
            }
            MessageType::Init => Self::Init(frame.init.unwrap_or_default()),
            MessageType::RoundTime => {
                Self::RoundTime(frame.round_time.unwrap_or_default())
            }
            MessageType::Frag => Self::Frag(frame.frag.unwrap_or_default()),
            MessageType::DemoEnd => Self::DemoEnd,
            MessageType::Progress => {
                Self::Progress(frame.progress.unwrap_or_default())
            }
            MessageType::Shot => Self::Shot(frame.shot.unwrap_or_default()),
            MessageType::PlayRequest => {
                Self::PlayRequest(frame.demo.unwrap_or_default())
            }
            MessageType::PlayChange => Self::PlayChange,
            MessageType::Error => Self::Alert(frame.message.unwrap_or_default()),
            MessageType::GrenadeEvent => {
                Self::GrenadeEvent(frame.grenade_event.unwrap_or_default())
            }
        })
    }
}

/// The inverse: a frame with the discriminant and exactly one payload set.
/// Replay servers and test fixtures use this to produce frames.
impl From<Message> for wire::Message {
    fn from(msg: Message) -> Self {
        let mut frame = wire::Message {
            msg_type: msg.tag() as i32,
            ..wire::Message::default()
        };
        match msg {
            Message::Empty | Message::DemoEnd | Message::PlayChange => {}
            Message::TickState(p) => frame.tick_state = Some(p),
            Message::Round(p) => frame.round = Some(p),
            Message::TeamUpdate(p) => frame.team_update = Some(p),
            Message::Init(p) => frame.init = Some(p),
            Message::RoundTime(p) => frame.round_time = Some(p),
            Message::Frag(p) => frame.frag = Some(p),
            Message::Progress(p) => frame.progress = Some(p),
            Message::Shot(p) => frame.shot = Some(p),
            Message::PlayRequest(p) => frame.demo = Some(p),
            Message::Alert(text) => frame.message = Some(text),
            Message::GrenadeEvent(p) => frame.grenade_event = Some(p),
        }
        frame
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// The replay the user picked: a match identifier plus where it came from.
///
/// The identifier is checked at construction, so every `ReplayTarget`
/// can be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplayTarget {
    match_id: String,
    platform: DemoPlatform,
}

impl ReplayTarget {
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] if `match_id` is blank;
    /// the server refuses those with "No matchId provided".
    pub fn new(
        match_id: impl Into<String>,
        platform: DemoPlatform,
    ) -> Result<Self, ProtocolError> {
        let match_id = match_id.into();
        if match_id.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage(
                "play request needs a match id".into(),
            ));
        }
        Ok(Self { match_id, platform })
    }

    /// Shorthand for a demo uploaded through the viewer's landing page.
    pub fn upload(match_id: impl Into<String>) -> Result<Self, ProtocolError> {
        Self::new(match_id, DemoPlatform::Upload)
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn platform(&self) -> DemoPlatform {
        self.platform
    }
}

impl fmt::Display for ReplayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.match_id, self.platform)
    }
}

/// Everything the viewer is allowed to send. Only play requests exist,
/// so there is no outbound combination a codec could refuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    PlayRequest(ReplayTarget),
}

impl From<&OutboundMessage> for wire::Message {
    fn from(msg: &OutboundMessage) -> Self {
        match msg {
            OutboundMessage::PlayRequest(target) => wire::Message {
                msg_type: MessageType::PlayRequest as i32,
                demo: Some(wire::Demo {
                    match_id: target.match_id.clone(),
                    platform: target.platform as i32,
                }),
                ..wire::Message::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// The two sides. The wire carries these as `"T"` / `"CT"` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    T,
    Ct,
}

impl Team {
    /// Parses the wire spelling. Anything else (spectators, empty) is
    /// `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "T" => Some(Self::T),
            "CT" => Some(Self::Ct),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::T => write!(f, "T"),
            Self::Ct => write!(f, "CT"),
        }
    }
}

impl crate::Player {
    /// The player's side, if the team string is one of the two sides.
    pub fn side(&self) -> Option<Team> {
        Team::parse(&self.team)
    }
}
