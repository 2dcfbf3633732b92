//! The full reducer set for one session.

use demoscope_bus::{EventBus, SubscriptionHandle};
use serde::Serialize;

use crate::{
    Entities, Explosions, KillFeed, MapInfo, Playback, Roster, RoundList, Scoreboard, Shots,
    Store,
};

/// One store per concern. Each store owns its slice exclusively.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub entities: Store<Entities>,
    pub shots: Store<Shots>,
    pub explosions: Store<Explosions>,
    pub kill_feed: Store<KillFeed>,
    pub map: Store<MapInfo>,
    pub roster: Store<Roster>,
    pub scoreboard: Store<Scoreboard>,
    pub rounds: Store<RoundList>,
    pub playback: Store<Playback>,
}

impl World {
    /// A world in its initial, empty state.
    pub fn new() -> Self {
        Self {
            entities: Store::new(),
            shots: Store::new(),
            explosions: Store::new(),
            kill_feed: Store::new(),
            map: Store::new(),
            roster: Store::new(),
            scoreboard: Store::new(),
            rounds: Store::new(),
            playback: Store::new(),
        }
    }

    /// Subscribes every reducer to `bus`, in a fixed order.
    pub fn attach(&self, bus: &EventBus) -> Vec<SubscriptionHandle> {
        let handles = vec![
            self.map.attach(bus),
            self.scoreboard.attach(bus),
            self.entities.attach(bus),
            self.roster.attach(bus),
            self.shots.attach(bus),
            self.explosions.attach(bus),
            self.kill_feed.attach(bus),
            self.rounds.attach(bus),
            self.playback.attach(bus),
        ];
        tracing::debug!(subscriptions = handles.len(), "world attached");
        handles
    }

    /// Copies every slice. Each slice is copied under its own lock, so a
    /// snapshot taken while frames are arriving may straddle two frames.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            entities: self.entities.snapshot(),
            shots: self.shots.snapshot(),
            explosions: self.explosions.snapshot(),
            kill_feed: self.kill_feed.snapshot(),
            map: self.map.snapshot(),
            roster: self.roster.snapshot(),
            scoreboard: self.scoreboard.snapshot(),
            rounds: self.rounds.snapshot(),
            playback: self.playback.snapshot(),
        }
    }
}

/// Owned copy of everything the presentation layer draws.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub entities: Entities,
    pub shots: Shots,
    pub explosions: Explosions,
    pub kill_feed: KillFeed,
    pub map: MapInfo,
    pub roster: Roster,
    pub scoreboard: Scoreboard,
    pub rounds: RoundList,
    pub playback: Playback,
}
