//! The bus itself: subscription table plus a serialized dispatch queue.

use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use demoscope_protocol::{Message, MessageType};

use crate::HandlerError;

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Something that reacts to published messages.
pub trait Handler: Send + Sync + 'static {
    /// Process a single message.
    fn handle(&self, msg: &Message) -> Result<(), HandlerError>;
}

/// Blanket implementation for closures.
impl<F> Handler for F
where
    F: Fn(&Message) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    fn handle(&self, msg: &Message) -> Result<(), HandlerError> {
        self(msg)
    }
}

/// Returned by [`EventBus::subscribe`]; pass it to
/// [`EventBus::unsubscribe`] to stop deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

struct Subscription {
    handle: SubscriptionHandle,
    tags: Vec<MessageType>,
    handler: Arc<dyn Handler>,
}

#[derive(Default)]
struct Table {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

#[derive(Default)]
struct Dispatch {
    pending: VecDeque<Message>,
    draining: bool,
    /// Thread currently inside [`EventBus::deliver`], if any.
    delivering: Option<ThreadId>,
}

#[derive(Default)]
struct Inner {
    table: Mutex<Table>,
    dispatch: Mutex<Dispatch>,
    /// Signalled whenever a delivery pass ends.
    delivered: Condvar,
}

/// Subscriber panics are caught, so a poisoned lock only means a panic
/// unwound through our own bookkeeping. The data is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Routes messages to subscribers by [`MessageType`].
///
/// Cloning is cheap and every clone is the same bus. The bus owns the
/// subscription table and nothing else; reducer state lives with the
/// reducers.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every tag in `tags`.
    ///
    /// Subscribing the same handler twice creates two entries and two
    /// deliveries per message.
    pub fn subscribe<H: Handler>(
        &self,
        tags: &[MessageType],
        handler: H,
    ) -> SubscriptionHandle {
        let _quiet = self.quiesce();
        let mut table = lock(&self.inner.table);
        table.next_id += 1;
        let handle = SubscriptionHandle(table.next_id);
        table.subscriptions.push(Subscription {
            handle,
            tags: tags.to_vec(),
            handler: Arc::new(handler),
        });
        tracing::trace!(%handle, ?tags, "subscribed");
        handle
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    ///
    /// Once this returns, the handler is never called again. Called from
    /// another thread while a message is being delivered, it blocks until
    /// that delivery finishes. Called from inside a handler, the message
    /// being delivered still reaches everyone it was routed to.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let _quiet = self.quiesce();
        let mut table = lock(&self.inner.table);
        let before = table.subscriptions.len();
        table.subscriptions.retain(|s| s.handle != handle);
        let removed = table.subscriptions.len() != before;
        if removed {
            tracing::trace!(%handle, "unsubscribed");
        }
        removed
    }

    /// Drops every subscription. Waits for an in-flight delivery on
    /// another thread the same way [`unsubscribe`](Self::unsubscribe) does.
    pub fn clear(&self) {
        let _quiet = self.quiesce();
        let mut table = lock(&self.inner.table);
        let dropped = table.subscriptions.len();
        table.subscriptions.clear();
        tracing::debug!(dropped, "bus cleared");
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.table).subscriptions.len()
    }

    /// Delivers `msg` to every subscriber of its tag.
    ///
    /// If no delivery is in progress, this delivers `msg` (and anything
    /// queued behind it) before returning. Otherwise `msg` is queued and
    /// delivered by the call that is already draining.
    pub fn publish(&self, msg: Message) {
        {
            let mut dispatch = lock(&self.inner.dispatch);
            dispatch.pending.push_back(msg);
            if dispatch.draining {
                return;
            }
            dispatch.draining = true;
        }

        loop {
            let next = {
                let mut dispatch = lock(&self.inner.dispatch);
                match dispatch.pending.pop_front() {
                    Some(msg) => {
                        dispatch.delivering = Some(thread::current().id());
                        msg
                    }
                    None => {
                        dispatch.draining = false;
                        return;
                    }
                }
            };
            self.deliver(&next);
            lock(&self.inner.dispatch).delivering = None;
            self.inner.delivered.notify_all();
        }
    }

    /// Waits until no other thread is delivering and returns the dispatch
    /// guard. Holding it keeps the next delivery from starting, so table
    /// changes made under it never overlap a delivery.
    fn quiesce(&self) -> MutexGuard<'_, Dispatch> {
        let me = thread::current().id();
        let mut dispatch = lock(&self.inner.dispatch);
        while dispatch.delivering.is_some_and(|t| t != me) {
            dispatch = self
                .inner
                .delivered
                .wait(dispatch)
                .unwrap_or_else(PoisonError::into_inner);
        }
        dispatch
    }

    fn deliver(&self, msg: &Message) {
        let tag = msg.tag();

        // Snapshot, then release the table lock so handlers can
        // (un)subscribe without deadlocking.
        let targets: Vec<(SubscriptionHandle, Arc<dyn Handler>)> = {
            let table = lock(&self.inner.table);
            table
                .subscriptions
                .iter()
                .filter(|s| s.tags.contains(&tag))
                .map(|s| (s.handle, Arc::clone(&s.handler)))
                .collect()
        };

        if targets.is_empty() {
            tracing::trace!(msg_type = ?tag, "no subscribers");
            return;
        }

        for (handle, handler) in targets {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| handler.handle(msg)))
                    .unwrap_or_else(|payload| {
                        Err(HandlerError::Panicked(panic_message(&*payload)))
                    });
            if let Err(error) = outcome {
                tracing::error!(%handle, msg_type = ?tag, %error, "subscriber failed");
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
