use demoscope_protocol::{Message, MessageType};
use serde::Serialize;

use crate::Reducer;

/// Team names and scores for the header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scoreboard {
    pub t_name: String,
    pub t_score: i32,
    pub ct_name: String,
    pub ct_score: i32,
}

impl Reducer for Scoreboard {
    const TAGS: &'static [MessageType] = &[MessageType::Init, MessageType::TeamUpdate];

    fn reduce(&mut self, msg: &Message) {
        match msg {
            Message::Init(init) => {
                self.t_name = init.t_name.clone();
                self.ct_name = init.ct_name.clone();
            }
            Message::TeamUpdate(update) => {
                self.t_name = update.t_name.clone();
                self.t_score = update.t_score;
                self.ct_name = update.ct_name.clone();
                self.ct_score = update.ct_score;
            }
            _ => {}
        }
    }
}
