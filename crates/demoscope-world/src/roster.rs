//! Players split into their team columns.

use demoscope_protocol::{Message, MessageType, Player, Team};
use serde::Serialize;

use crate::Reducer;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Roster {
    pub t: Vec<Player>,
    pub ct: Vec<Player>,
}

impl Roster {
    pub fn side(&self, team: Team) -> &[Player] {
        match team {
            Team::T => &self.t,
            Team::Ct => &self.ct,
        }
    }
}

impl Reducer for Roster {
    const TAGS: &'static [MessageType] = &[MessageType::TickStateUpdate];

    fn reduce(&mut self, msg: &Message) {
        let Message::TickState(state) = msg else {
            return;
        };
        // Same guard as `Entities`: no players means no update.
        if state.players.is_empty() {
            return;
        }
        self.t.clear();
        self.ct.clear();
        for player in &state.players {
            match player.side() {
                Some(Team::T) => self.t.push(player.clone()),
                Some(Team::Ct) => self.ct.push(player.clone()),
                None => {
                    tracing::trace!(player_id = player.player_id, team = %player.team, "player without a side");
                }
            }
        }
    }
}
