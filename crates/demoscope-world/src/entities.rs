//! Continuously updated entities: players, in-flight grenades, bomb.

use demoscope_protocol::{Bomb, Grenade, Message, MessageType, Player};
use serde::Serialize;

use crate::Reducer;

/// Where the bomb is drawn when nobody reported it: outside every map.
pub const OFF_MAP: Bomb = Bomb { x: -100.0, y: -100.0 };

/// Latest tick's players, grenades and bomb.
///
/// Every field is replaced as a unit by the next tick that carries
/// players. Nothing is merged across ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entities {
    pub tick: i32,
    /// In arrival order, duplicates kept.
    pub players: Vec<Player>,
    pub nades: Vec<Grenade>,
    pub bomb: Bomb,
}

impl Default for Entities {
    fn default() -> Self {
        Self {
            tick: 0,
            players: Vec::new(),
            nades: Vec::new(),
            bomb: OFF_MAP,
        }
    }
}

impl Entities {
    pub fn player(&self, player_id: i32) -> Option<&Player> {
        self.players.iter().find(|p| p.player_id == player_id)
    }
}

impl Reducer for Entities {
    const TAGS: &'static [MessageType] = &[MessageType::TickStateUpdate];

    fn reduce(&mut self, msg: &Message) {
        let Message::TickState(state) = msg else {
            return;
        };
        // Partially populated frames carry no players; keep what we have.
        if state.players.is_empty() {
            tracing::trace!(tick = state.tick, "tick without players ignored");
            return;
        }
        self.tick = state.tick;
        self.players = state.players.clone();
        self.nades = state.nades.clone();
        self.bomb = state.bomb.clone().unwrap_or(OFF_MAP);
    }
}
