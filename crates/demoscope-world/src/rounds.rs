use demoscope_protocol::{Message, MessageType, Round};
use serde::Serialize;

use crate::Reducer;

/// Rounds seen so far, ordered by round number.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundList {
    pub rounds: Vec<Round>,
}

impl RoundList {
    pub fn get(&self, round_no: i32) -> Option<&Round> {
        self.rounds
            .binary_search_by_key(&round_no, |r| r.round_no)
            .ok()
            .map(|i| &self.rounds[i])
    }
}

impl Reducer for RoundList {
    const TAGS: &'static [MessageType] = &[MessageType::Round];

    fn reduce(&mut self, msg: &Message) {
        let Message::Round(round) = msg else {
            return;
        };
        match self.rounds.binary_search_by_key(&round.round_no, |r| r.round_no) {
            Ok(i) => self.rounds[i] = round.clone(),
            Err(i) => self.rounds.insert(i, round.clone()),
        }
    }
}
