//! End-to-end reducer behaviour through a real bus.

use demoscope_bus::EventBus;
use demoscope_protocol::{Bomb, Frag, Grenade, Init, Message, Player, Shot, TickState};
use demoscope_world::{OFF_MAP, World, WorldSnapshot};

// =========================================================================
// Helpers
// =========================================================================

fn attached() -> (EventBus, World) {
    let bus = EventBus::new();
    let world = World::new();
    world.attach(&bus);
    (bus, world)
}

fn init(map: &str) -> Message {
    Message::Init(Init {
        map_name: map.into(),
        ..Init::default()
    })
}

fn player(id: i32, team: &str) -> Player {
    Player {
        player_id: id,
        team: team.into(),
        ..Player::default()
    }
}

fn tick(players: Vec<Player>, bomb: Option<Bomb>) -> Message {
    Message::TickState(TickState {
        tick: 1,
        players,
        nades: vec![],
        bomb,
    })
}

fn shot(player_id: i32) -> Message {
    Message::Shot(Shot {
        player_id,
        x: 10.0,
        y: 20.0,
        rotation: 90.0,
    })
}

// =========================================================================
// Scenario
// =========================================================================

#[test]
fn test_match_opening_scenario() {
    let (bus, world) = attached();

    bus.publish(init("de_dust2"));
    bus.publish(tick(vec![player(1, "T")], Some(Bomb { x: 0.0, y: 0.0 })));

    assert_eq!(world.map.read(|m| m.map_name.clone()), Some("de_dust2".to_string()));
    let ids: Vec<_> = world.entities.read(|e| e.players.iter().map(|p| p.player_id).collect());
    assert_eq!(ids, vec![1]);

    // Empty player list: nothing changes.
    bus.publish(tick(vec![], None));
    assert_eq!(world.entities.read(|e| e.players.len()), 1);
    assert_eq!(world.entities.read(|e| e.bomb.clone()), Bomb { x: 0.0, y: 0.0 });

    bus.publish(shot(1));
    bus.publish(shot(1));
    assert_eq!(world.shots.read(|s| s.list.len()), 2);

    world.shots.update(|s| s.remove(0));
    world.shots.read(|s| {
        assert_eq!(s.list.len(), 2);
        assert_eq!(s.list.live_count(), 1);
        assert!(s.list.get(0).is_none());
        assert!(s.list.get(1).is_some());
    });

    bus.publish(Message::PlayChange);
    assert_eq!(world.shots.read(|s| s.list.len()), 0);
}

#[test]
fn test_play_change_clears_ephemeral_lists_but_not_entities() {
    let (bus, world) = attached();

    bus.publish(tick(vec![player(1, "CT")], None));
    for id in 0..20 {
        bus.publish(shot(id));
        bus.publish(Message::GrenadeEvent(Grenade {
            id: id + 1,
            kind: "smoke".into(),
            ..Grenade::default()
        }));
    }
    bus.publish(Message::Frag(Frag::default()));
    world.explosions.update(|e| e.remove(3));

    bus.publish(Message::PlayChange);

    let snap = world.snapshot();
    assert!(snap.shots.list.is_empty());
    assert!(snap.explosions.list.is_empty());
    assert!(snap.kill_feed.list.is_empty());
    assert_eq!(snap.entities.players.len(), 1);
    assert_eq!(snap.entities.bomb, OFF_MAP);
}

#[test]
fn test_new_world_on_new_bus_starts_empty() {
    let (old_bus, old_world) = attached();
    for n in 0..100 {
        old_bus.publish(Message::TickState(TickState {
            tick: n,
            players: vec![player(n, "T")],
            ..TickState::default()
        }));
        old_bus.publish(shot(n));
    }
    old_bus.publish(init("de_overpass"));
    assert_ne!(old_world.snapshot(), WorldSnapshot::default());

    // Restart: drop every subscription and build a fresh pair.
    old_bus.clear();
    let (bus, world) = attached();
    assert_eq!(world.snapshot(), WorldSnapshot::default());

    // The old bus no longer reaches anything, old world included.
    let before = old_world.snapshot();
    old_bus.publish(shot(999));
    assert_eq!(old_world.snapshot(), before);
    assert_eq!(world.snapshot(), WorldSnapshot::default());

    bus.publish(init("de_vertigo"));
    assert_eq!(world.snapshot().map.asset_key(), "de_vertigo");
}
