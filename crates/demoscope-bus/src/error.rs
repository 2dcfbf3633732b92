//! Error types for the bus.

/// A subscriber faulted while handling a message.
///
/// The bus logs these and moves on to the next subscriber; they never
/// reach the publisher.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("handler failed: {0}")]
    Failed(String),

    /// The handler panicked. The payload is the panic message when it
    /// was a string.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}
