//! Shots and grenade explosions.
//!
//! Both are short-lived markers. The reducers only append and tombstone;
//! deciding *when* an entry goes away belongs to whoever draws it (see
//! [`ExpiryQueue`](crate::ExpiryQueue)). A play-change message clears
//! both lists outright, tombstones included.

use demoscope_protocol::{Grenade, Message, MessageType, Shot};
use serde::Serialize;

use crate::{Reducer, SlotList};

// ---------------------------------------------------------------------------
// Shots
// ---------------------------------------------------------------------------

/// Bullet tracers, one slot per shot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Shots {
    pub list: SlotList<Shot>,
}

impl Shots {
    /// Tombstones shot `index`. Returns whether a live shot was removed.
    pub fn remove(&mut self, index: usize) -> bool {
        self.list.remove(index).is_some()
    }
}

impl Reducer for Shots {
    const TAGS: &'static [MessageType] = &[MessageType::Shot, MessageType::PlayChange];

    fn reduce(&mut self, msg: &Message) {
        match msg {
            Message::Shot(shot) => {
                self.list.push(shot.clone());
            }
            Message::PlayChange => self.list.clear(),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Explosions
// ---------------------------------------------------------------------------

/// Grenade detonations, one slot per event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Explosions {
    pub list: SlotList<Grenade>,
}

impl Explosions {
    pub fn remove(&mut self, index: usize) -> bool {
        self.list.remove(index).is_some()
    }

    /// Live explosions worth drawing. Id 0 is what an unset grenade id
    /// decodes to, so those are skipped.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Grenade)> {
        self.list.iter_live().filter(|(_, g)| g.id != 0)
    }

    /// Slot index of the most recent live explosion for grenade `id`.
    pub fn position(&self, id: i32) -> Option<usize> {
        self.list
            .iter_live()
            .filter(|(_, g)| g.id == id)
            .map(|(i, _)| i)
            .last()
    }
}

impl Reducer for Explosions {
    const TAGS: &'static [MessageType] = &[MessageType::GrenadeEvent, MessageType::PlayChange];

    fn reduce(&mut self, msg: &Message) {
        match msg {
            Message::GrenadeEvent(grenade) => {
                self.list.push(grenade.clone());
            }
            Message::PlayChange => self.list.clear(),
            _ => {}
        }
    }
}
