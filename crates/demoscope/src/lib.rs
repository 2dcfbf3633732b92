//! # Demoscope
//!
//! Event ingestion and world reconstruction for match replay viewers.
//!
//! A replay server streams binary, typed events over a WebSocket.
//! Demoscope decodes them, routes them through an in-process event bus,
//! and folds them into a renderable world: players, grenades, bomb,
//! shots, explosions, kills, scores. The presentation layer only ever
//! reads snapshots and forwards a few callbacks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demoscope::prelude::*;
//!
//! # async fn run() -> Result<(), DemoscopeError> {
//! let viewer = Viewer::builder()
//!     .config(SessionConfig::from_env()?)
//!     .build();
//!
//! viewer.select_replay("2f1c9a").await?;
//! loop {
//!     let world = viewer.snapshot().await;
//!     // draw world.entities.players, world.shots.list, ...
//!     viewer.expire(std::time::Instant::now()).await;
//!     # break;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate                 | Role                                      |
//! |-----------------------|-------------------------------------------|
//! | `demoscope-protocol`  | wire schema and codecs                    |
//! | `demoscope-transport` | connection traits, WebSocket client       |
//! | `demoscope-bus`       | typed publish/subscribe                   |
//! | `demoscope-world`     | reducers, snapshots, expiry               |
//! | `demoscope-session`   | transport adapter and session lifecycle   |

mod error;
mod viewer;

pub use error::DemoscopeError;
pub use viewer::{Viewer, ViewerBuilder};

pub use demoscope_bus as bus;
pub use demoscope_protocol as protocol;
pub use demoscope_session as session;
pub use demoscope_transport as transport;
pub use demoscope_world as world;

/// Everything needed to embed a viewer.
pub mod prelude {
    pub use crate::{DemoscopeError, Viewer, ViewerBuilder};
    pub use demoscope_bus::{EventBus, Handler, HandlerError, SubscriptionHandle};
    pub use demoscope_protocol::{DemoPlatform, Message, MessageType, ReplayTarget, Team};
    pub use demoscope_session::{
        AlertSink, ConnectionState, LogAlertSink, SessionConfig, SessionId,
    };
    pub use demoscope_world::{Lifetimes, SlotList, World, WorldSnapshot};
}
