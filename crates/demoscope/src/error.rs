//! Unified error type for demoscope.

use demoscope_bus::HandlerError;
use demoscope_protocol::ProtocolError;
use demoscope_session::SessionError;
use demoscope_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `demoscope` meta-crate you deal with this single
/// error type; `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DemoscopeError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (decode, invalid replay target).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (bad config, stale session).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A subscriber fault surfaced by a custom handler.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let err: DemoscopeError = err.into();
        assert!(matches!(err, DemoscopeError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: DemoscopeError = ProtocolError::UnknownMessageType(77).into();
        assert!(matches!(err, DemoscopeError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err: DemoscopeError = SessionError::NoActiveSession.into();
        assert!(matches!(err, DemoscopeError::Session(_)));
    }

    #[test]
    fn test_from_handler_error() {
        let err: DemoscopeError = HandlerError::failed("bad frame").into();
        assert!(matches!(err, DemoscopeError::Handler(_)));
        assert!(err.to_string().contains("bad frame"));
    }
}
