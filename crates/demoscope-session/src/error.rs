//! Error types for the session layer.

use demoscope_protocol::ProtocolError;

/// Errors that can occur while starting, running or ending a session.
///
/// Decode and handler failures never show up here; they are dropped and
/// logged where they happen. Transport failures are published as alerts
/// and end the session's connection in `Errored`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The replay identifier was rejected before anything was dialed
    /// (e.g. blank match id).
    #[error("invalid replay target: {0}")]
    InvalidTarget(#[source] ProtocolError),

    /// A configuration value could not be understood, such as an unknown
    /// platform name in `DEMOSCOPE_PLATFORM`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `end_session` was called with a handle that is not the active one.
    #[error("no active session")]
    NoActiveSession,
}
