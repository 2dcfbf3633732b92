//! Where terminal notifications go.
//!
//! Demoscope doesn't decide how a fatal condition is shown to a person.
//! A desktop shell might open a modal, a TUI might print a banner, a
//! headless run just logs it. Each of those is an [`AlertSink`].
//!
//! Two things reach the sink:
//!
//! - alert messages sent by the replay server (e.g. "demo not found")
//! - the single notification a session emits when its connection fails
//!
//! Both travel over the session's bus on the reserved alert tag, so a
//! session only ever has one path to the user.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use demoscope_session::AlertSink;
//!
//! let shown = Arc::new(Mutex::new(Vec::<String>::new()));
//! let sink = {
//!     let shown = Arc::clone(&shown);
//!     move |text: &str| shown.lock().unwrap().push(text.to_string())
//! };
//!
//! sink.notify("connection lost");
//! assert_eq!(shown.lock().unwrap().len(), 1);
//! ```

/// Surfaces alert text to the user.
///
/// # Trait bounds
///
/// `Send + Sync + 'static`: the sink is shared between the viewer and
/// the bus handler of every session it starts, and those handlers run on
/// the transport task.
pub trait AlertSink: Send + Sync + 'static {
    /// Shows `text` as a terminal notification.
    fn notify(&self, text: &str);
}

/// Blanket implementation for closures.
impl<F> AlertSink for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn notify(&self, text: &str) {
        self(text)
    }
}

/// Writes alerts to the `tracing` error log. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&self, text: &str) {
        tracing::error!(alert = %text, "replay alert");
    }
}
