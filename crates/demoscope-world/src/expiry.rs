//! Timed removal of ephemeral entries.
//!
//! Reducers never delete shots or explosions on their own. Whoever draws
//! them keeps an [`ExpiryQueue`] per list: after each frame it calls
//! [`observe`](ExpiryQueue::observe) so newly appended slots get a
//! deadline, then asks for [`due`](ExpiryQueue::due) indices and removes
//! them from the reducer.
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use demoscope_world::{ExpiryQueue, SlotList};
//!
//! let mut shots = SlotList::new();
//! shots.push("tracer");
//!
//! let mut queue = ExpiryQueue::new(Duration::from_millis(200));
//! let start = Instant::now();
//! queue.observe(&shots, start);
//!
//! assert!(queue.due(start).is_empty());
//! assert_eq!(queue.due(start + Duration::from_millis(200)), vec![0]);
//! ```

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::SlotList;

/// How long each kind of ephemeral entry stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetimes {
    pub shot: Duration,
    pub explosion: Duration,
    pub kill: Duration,
}

impl Default for Lifetimes {
    fn default() -> Self {
        Self {
            shot: Duration::from_millis(200),
            explosion: Duration::from_secs(1),
            kill: Duration::from_secs(5),
        }
    }
}

/// Deadlines for the slots of one [`SlotList`].
#[derive(Debug)]
pub struct ExpiryQueue {
    ttl: Duration,
    /// Slots `0..seen` already have a deadline.
    seen: usize,
    generation: u64,
    heap: BinaryHeap<Reverse<(Instant, usize)>>,
}

impl ExpiryQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            seen: 0,
            generation: 0,
            heap: BinaryHeap::new(),
        }
    }

    /// Gives every slot appended since the last call a deadline of
    /// `now + ttl`.
    ///
    /// If the list was cleared in between, pending deadlines point into a
    /// list that no longer exists and are dropped.
    pub fn observe<T>(&mut self, list: &SlotList<T>, now: Instant) {
        if list.generation() != self.generation {
            self.generation = list.generation();
            self.seen = 0;
            self.heap.clear();
        }
        let deadline = now + self.ttl;
        for index in self.seen..list.len() {
            self.heap.push(Reverse((deadline, index)));
        }
        self.seen = list.len();
    }

    /// Pops every index whose deadline is at or before `now`, oldest
    /// deadline first.
    pub fn due(&mut self, now: Instant) -> Vec<usize> {
        let mut expired = Vec::new();
        while let Some(Reverse((deadline, index))) = self.heap.peek().copied() {
            if deadline > now {
                break;
            }
            self.heap.pop();
            expired.push(index);
        }
        expired
    }

    /// Number of slots still waiting for their deadline.
    pub fn pending(&self) -> usize {
        self.heap.len()
    }
}
