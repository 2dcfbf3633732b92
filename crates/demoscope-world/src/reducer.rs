//! The `Reducer` trait and the `Store` that connects one to a bus.
//!
//! A reducer is a slice of renderable state plus a function
//! `(state, message) -> state`. It knows nothing about buses, locks, or
//! threads, so it can be driven directly in tests:
//!
//! ```rust
//! use demoscope_protocol::{Init, Message};
//! use demoscope_world::{MapInfo, Reducer};
//!
//! let mut map = MapInfo::default();
//! map.reduce(&Message::Init(Init { map_name: "de_nuke".into(), ..Init::default() }));
//! assert_eq!(map.asset_key(), "de_nuke");
//! ```
//!
//! [`Store`] wraps a reducer in shared ownership so a bus handler can
//! feed it while the presentation layer reads it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use demoscope_bus::{EventBus, HandlerError, SubscriptionHandle};
use demoscope_protocol::{Message, MessageType};

/// A slice of world state that updates itself from messages.
///
/// `Default` is the state before any message arrived. Reducers never
/// fail and never suspend; a message they cannot use is ignored.
pub trait Reducer: Default + Send + 'static {
    /// The message types this reducer subscribes to.
    const TAGS: &'static [MessageType];

    /// Folds one message into the state.
    fn reduce(&mut self, msg: &Message);
}

/// Shared, lockable home for one reducer.
///
/// Cloning a `Store` shares the same state.
#[derive(Debug, Default)]
pub struct Store<R> {
    state: Arc<Mutex<R>>,
}

impl<R> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: Reducer> Store<R> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(R::default())),
        }
    }

    /// Subscribes the reducer to `R::TAGS` on `bus`.
    pub fn attach(&self, bus: &EventBus) -> SubscriptionHandle {
        let state = Arc::clone(&self.state);
        bus.subscribe(R::TAGS, move |msg: &Message| -> Result<(), HandlerError> {
            lock(&state).reduce(msg);
            Ok(())
        })
    }

    /// Runs `f` against the current state.
    pub fn read<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&lock(&self.state))
    }

    /// Runs `f` with mutable access. This is how presentation callbacks
    /// (e.g. "remove shot at index i") reach a reducer.
    pub fn update<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut lock(&self.state))
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> R
    where
        R: Clone,
    {
        lock(&self.state).clone()
    }
}

// A reducer that panicked mid-update leaves a poisoned lock; the bus has
// already logged the panic, and the partially updated state is still the
// best state available.
fn lock<R>(mutex: &Mutex<R>) -> MutexGuard<'_, R> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
