//! In-process event bus for demoscope.
//!
//! Decoded messages are published here once and fanned out to every
//! subscriber whose tag set contains the message's [`MessageType`].
//!
//! ```text
//! Transport adapter ──publish──→ EventBus ──→ tick reducer
//!                                        ├──→ shot reducer
//!                                        └──→ alert sink (tag 13)
//! ```
//!
//! # Delivery guarantees
//!
//! - Synchronous, in registration order.
//! - The subscriber list is snapshotted when a message is dispatched, so
//!   (un)subscribing from inside a handler only affects later messages.
//! - A failing or panicking handler is logged and skipped.
//! - Publishes never interleave: a publish issued while another is being
//!   delivered (from a handler or another thread) is queued and delivered
//!   afterwards by the publisher already draining the queue.

mod bus;
mod error;

pub use bus::{EventBus, Handler, SubscriptionHandle};
pub use error::HandlerError;

use demoscope_protocol::MessageType;

/// The tag reserved for fatal alerts. Subscribers to it surface the
/// alert text to the user.
pub const ALERT_TAG: MessageType = MessageType::Error;
