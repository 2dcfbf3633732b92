//! Replay session management for demoscope.
//!
//! This crate handles the lifecycle of one replay connection:
//!
//! 1. **Transport** — dialing the server, sending the play request, and
//!    decoding frames onto a bus ([`TransportAdapter`])
//! 2. **Sessions** — a fresh bus, world and adapter per replay
//!    ([`Session`])
//! 3. **Restart** — ending the old session before the next one starts
//!    ([`SessionManager`])
//! 4. **Alerts** — routing fatal conditions to the user ([`AlertSink`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Viewer (above)  ← select_replay / reset_session / snapshot
//!     ↕
//! Session Layer (this crate)  ← one bus + world + transport task per replay
//!     ↕
//! Bus / World / Transport / Protocol (below)
//! ```

mod adapter;
mod alert;
mod error;
mod manager;
mod session;

pub use adapter::{ConnectionState, TransportAdapter};
pub use alert::{AlertSink, LogAlertSink};
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{DEFAULT_SERVER_URL, Session, SessionConfig, SessionId, parse_platform};
