//! Index-stable list with tombstones.
//!
//! Ephemeral events (shots, explosions, kill-feed lines) are removed by
//! index from presentation timers that were started when the entry was
//! appended. Compacting the list would shift every later index and make
//! those timers remove the wrong entry, so removal leaves a `None`
//! tombstone in place instead.

use serde::Serialize;

/// An append-only list whose slots can be emptied but never refilled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotList<T> {
    slots: Vec<Option<T>>,
    /// Bumped on every [`clear`](Self::clear) so index holders can tell
    /// that their indices refer to an older list.
    #[serde(skip)]
    generation: u64,
}

impl<T> Default for SlotList<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generation: 0,
        }
    }
}

impl<T> SlotList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends at the next index and returns that index.
    pub fn push(&mut self, item: T) -> usize {
        self.slots.push(Some(item));
        self.slots.len() - 1
    }

    /// Tombstones slot `index` and returns what it held.
    ///
    /// Out-of-range and already-removed indices are a no-op returning
    /// `None`; no other slot is touched.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// The live value at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of slots, tombstones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots still holding a value.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Live entries with their indices, tombstones skipped.
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (i, item)))
    }

    /// Every slot in order, `None` for tombstones.
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Hard reset: drops every slot, tombstones included.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
