//! World state reconstruction for demoscope.
//!
//! The server streams partial, overlapping events. This crate folds them
//! into a renderable picture of the match, one reducer per concern.
//!
//! # Key types
//!
//! - [`Reducer`]: state slice plus `(state, message) -> state`
//! - [`Store`]: shared home for a reducer, attachable to an `EventBus`
//! - [`World`]: every store for one session, and its [`WorldSnapshot`]
//! - [`SlotList`]: index-stable list for shots, explosions and kills
//! - [`ExpiryQueue`]: tells the presentation layer which slots to remove
//!
//! # Reducers
//!
//! | Reducer        | Tags                          | Keeps                          |
//! |----------------|-------------------------------|--------------------------------|
//! | [`Entities`]   | tick state                    | players, nades, bomb           |
//! | [`Roster`]     | tick state                    | players split by team          |
//! | [`Shots`]      | shot, play change             | tracers                        |
//! | [`Explosions`] | grenade event, play change    | detonations                    |
//! | [`KillFeed`]   | frag, play change             | recent kills                   |
//! | [`MapInfo`]    | init                          | map asset key                  |
//! | [`Scoreboard`] | init, team update             | names and scores               |
//! | [`RoundList`]  | round                         | rounds by number               |
//! | [`Playback`]   | round time, progress, demo end| clock, loading bar, end flag   |

mod entities;
mod ephemeral;
mod expiry;
mod killfeed;
mod map;
mod playback;
mod reducer;
mod roster;
mod rounds;
mod scoreboard;
mod slots;
mod world;

pub use entities::{Entities, OFF_MAP};
pub use ephemeral::{Explosions, Shots};
pub use expiry::{ExpiryQueue, Lifetimes};
pub use killfeed::KillFeed;
pub use map::{DEFAULT_MAP, MapInfo};
pub use playback::Playback;
pub use reducer::{Reducer, Store};
pub use roster::Roster;
pub use rounds::RoundList;
pub use scoreboard::Scoreboard;
pub use slots::SlotList;
pub use world::{World, WorldSnapshot};
