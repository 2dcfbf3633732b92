//! Protobuf wire schema.
//!
//! This crate owns the schema: the message set and the `MessageType` and
//! `DemoPlatform` values follow the replay server, while the field tags
//! are assigned here. The structs derive `prost::Message` by hand instead
//! of being generated by a build script, so the schema lives next to the
//! code that reads it.
//!
//! The same structs also derive serde with camelCase names. That is only
//! used by the text-frame fallback ([`JsonCodec`](crate::JsonCodec)),
//! where a server sends `{"msgType": 4, "init": {"mapName": "de_nuke"}}`
//! instead of protobuf bytes.
//!
//! Nothing outside this crate should build a [`Message`] by hand; the
//! domain [`crate::Message`] union converts to and from it.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Discriminants
// ---------------------------------------------------------------------------

/// The `msgType` discriminant carried by every frame.
///
/// Values are fixed by the replay server. `Error` (13) is the reserved
/// alert tag: its frames carry only a human-readable `message`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
)]
#[repr(i32)]
pub enum MessageType {
    Empty = 0,
    TickStateUpdate = 1,
    Round = 2,
    TeamUpdate = 3,
    Init = 4,
    RoundTime = 5,
    Frag = 6,
    DemoEnd = 7,
    Progress = 8,
    Shot = 9,
    PlayRequest = 10,
    PlayChange = 11,
    Error = 13,
    GrenadeEvent = 14,
}

/// Where a demo came from. The viewer only ever requests `Upload`
/// demos, but the server understands all three.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
)]
#[repr(i32)]
pub enum DemoPlatform {
    Faceit = 0,
    Steam = 1,
    Upload = 2,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level frame. Exactly one optional payload is meaningful for a
/// given `msg_type`; the others are ignored on decode.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    #[prost(enumeration = "MessageType", tag = "1")]
    pub msg_type: i32,
    #[prost(message, optional, tag = "2")]
    pub tick_state: Option<TickState>,
    #[prost(message, optional, tag = "3")]
    pub round: Option<Round>,
    #[prost(message, optional, tag = "4")]
    pub team_update: Option<TeamUpdate>,
    #[prost(message, optional, tag = "5")]
    pub init: Option<Init>,
    #[prost(message, optional, tag = "6")]
    pub round_time: Option<RoundTime>,
    #[prost(message, optional, tag = "7")]
    pub frag: Option<Frag>,
    #[prost(message, optional, tag = "8")]
    pub shot: Option<Shot>,
    #[prost(message, optional, tag = "9")]
    pub demo: Option<Demo>,
    #[prost(message, optional, tag = "10")]
    pub progress: Option<Progress>,
    #[prost(string, optional, tag = "11")]
    pub message: Option<String>,
    #[prost(message, optional, tag = "12")]
    pub grenade_event: Option<Grenade>,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// One server tick: every visible player, every in-flight grenade, and
/// the bomb.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TickState {
    #[prost(int32, tag = "1")]
    pub tick: i32,
    #[prost(message, repeated, tag = "2")]
    pub players: Vec<Player>,
    #[prost(message, repeated, tag = "3")]
    pub nades: Vec<Grenade>,
    #[prost(message, optional, tag = "4")]
    pub bomb: Option<Bomb>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Player {
    #[prost(int32, tag = "1")]
    pub player_id: i32,
    #[prost(string, tag = "2")]
    pub name: String,
    /// `"T"` or `"CT"`.
    #[prost(string, tag = "3")]
    pub team: String,
    #[prost(float, tag = "4")]
    pub x: f32,
    #[prost(float, tag = "5")]
    pub y: f32,
    #[prost(float, tag = "6")]
    pub rotation: f32,
    #[prost(bool, tag = "7")]
    pub alive: bool,
    #[prost(int32, tag = "8")]
    pub hp: i32,
    #[prost(int32, tag = "9")]
    pub armor: i32,
    #[prost(string, tag = "10")]
    pub primary: String,
    #[prost(string, tag = "11")]
    pub secondary: String,
    #[prost(int32, tag = "12")]
    pub money: i32,
    #[prost(bool, tag = "13")]
    pub flashed: bool,
    #[prost(bool, tag = "14")]
    pub defuse_kit: bool,
}

/// A grenade, either in flight (inside a tick) or detonating (as a
/// grenade event).
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Grenade {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub kind: String,
    #[prost(float, tag = "3")]
    pub x: f32,
    #[prost(float, tag = "4")]
    pub y: f32,
    #[prost(string, tag = "5")]
    pub action: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bomb {
    #[prost(float, tag = "1")]
    pub x: f32,
    #[prost(float, tag = "2")]
    pub y: f32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shot {
    #[prost(int32, tag = "1")]
    pub player_id: i32,
    #[prost(float, tag = "2")]
    pub x: f32,
    #[prost(float, tag = "3")]
    pub y: f32,
    #[prost(float, tag = "4")]
    pub rotation: f32,
}

/// A kill.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Frag {
    #[prost(string, tag = "1")]
    pub killer_name: String,
    #[prost(string, tag = "2")]
    pub killer_team: String,
    #[prost(string, tag = "3")]
    pub victim_name: String,
    #[prost(string, tag = "4")]
    pub victim_team: String,
    #[prost(string, tag = "5")]
    pub weapon: String,
    #[prost(bool, tag = "6")]
    pub headshot: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Init {
    #[prost(string, tag = "1")]
    pub map_name: String,
    #[prost(string, tag = "2")]
    pub t_name: String,
    #[prost(string, tag = "3")]
    pub ct_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Round {
    #[prost(int32, tag = "1")]
    pub round_no: i32,
    #[prost(int32, tag = "2")]
    pub start_tick: i32,
    #[prost(int32, tag = "3")]
    pub end_tick: i32,
    /// `"T"`, `"CT"`, or empty while the round is running.
    #[prost(string, tag = "4")]
    pub winner: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamUpdate {
    #[prost(string, tag = "1")]
    pub t_name: String,
    #[prost(int32, tag = "2")]
    pub t_score: i32,
    #[prost(string, tag = "3")]
    pub ct_name: String,
    #[prost(int32, tag = "4")]
    pub ct_score: i32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoundTime {
    /// Already formatted by the server, e.g. `"1:42"`.
    #[prost(string, tag = "1")]
    pub round_time: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    #[prost(int32, tag = "1")]
    pub progress: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

/// Play-request payload: which demo to stream.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Demo {
    #[prost(string, tag = "1")]
    pub match_id: String,
    #[prost(enumeration = "DemoPlatform", tag = "2")]
    pub platform: i32,
}
