//! Recent kills, shown in the corner and timed out by the presentation.

use demoscope_protocol::{Frag, Message, MessageType};
use serde::Serialize;

use crate::{Reducer, SlotList};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KillFeed {
    pub list: SlotList<Frag>,
}

impl KillFeed {
    pub fn remove(&mut self, index: usize) -> bool {
        self.list.remove(index).is_some()
    }

    /// Live kills, newest last.
    pub fn recent(&self) -> impl Iterator<Item = &Frag> {
        self.list.iter_live().map(|(_, frag)| frag)
    }
}

impl Reducer for KillFeed {
    const TAGS: &'static [MessageType] = &[MessageType::Frag, MessageType::PlayChange];

    fn reduce(&mut self, msg: &Message) {
        match msg {
            Message::Frag(frag) => {
                self.list.push(frag.clone());
            }
            Message::PlayChange => self.list.clear(),
            _ => {}
        }
    }
}
