//! Session start, restart and teardown.

mod common;

use std::sync::{Arc, Mutex};

use common::{MockConnector, eventually, within};
use demoscope_protocol::{Init, Message, MessageType, Player, Shot, TickState};
use demoscope_session::{
    AlertSink, ConnectionState, SessionConfig, SessionError, SessionManager,
};
use demoscope_world::WorldSnapshot;

// =========================================================================
// Helpers
// =========================================================================

type Alerts = Arc<Mutex<Vec<String>>>;

fn alert_log() -> (Alerts, Arc<dyn AlertSink>) {
    let alerts: Alerts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&alerts);
    let sink: Arc<dyn AlertSink> = Arc::new(move |text: &str| {
        sink.lock().unwrap().push(text.to_string());
    });
    (alerts, sink)
}

fn manager() -> (
    SessionManager<MockConnector>,
    tokio::sync::mpsc::UnboundedReceiver<common::Remote>,
    Alerts,
) {
    let (connector, remotes) = MockConnector::new();
    let (alerts, sink) = alert_log();
    let manager = SessionManager::new(connector, SessionConfig::default(), sink);
    (manager, remotes, alerts)
}

fn tick(n: i32) -> Message {
    Message::TickState(TickState {
        tick: n,
        players: vec![Player {
            player_id: n,
            team: "T".into(),
            ..Player::default()
        }],
        ..TickState::default()
    })
}

// =========================================================================
// Starting
// =========================================================================

#[tokio::test]
async fn test_select_replay_builds_world_from_frames() {
    let (mut manager, mut remotes, _) = manager();
    let id = manager.select_replay("m-1").await.unwrap();

    let mut remote = within(remotes.recv()).await.unwrap();
    let request = remote.next_sent().await;
    assert_eq!(request.demo.unwrap().match_id, "m-1");

    remote.push(Message::Init(Init {
        map_name: "de_dust2".into(),
        ..Init::default()
    }));
    remote.push(tick(1));

    let session = manager.active().unwrap();
    assert_eq!(session.id(), id);
    eventually(|| session.snapshot().entities.tick == 1).await;
    assert_eq!(session.snapshot().map.asset_key(), "de_dust2");
    assert_eq!(session.state(), ConnectionState::Open);
}

#[tokio::test]
async fn test_select_replay_blank_id_keeps_current_session() {
    let (mut manager, mut remotes, _) = manager();
    let id = manager.select_replay("m-1").await.unwrap();
    let _remote = within(remotes.recv()).await.unwrap();

    let result = manager.select_replay("   ").await;

    assert!(matches!(result, Err(SessionError::InvalidTarget(_))));
    assert_eq!(manager.active().map(|s| s.id()), Some(id));
}

// =========================================================================
// Restart
// =========================================================================

#[tokio::test]
async fn test_restart_yields_empty_world_and_detaches_old_bus() {
    let (mut manager, mut remotes, _) = manager();
    manager.select_replay("m-1").await.unwrap();
    let first = within(remotes.recv()).await.unwrap();
    for n in 1..=50 {
        first.push(tick(n));
        first.push(Message::Shot(Shot::default()));
    }
    let old_bus = manager.active().unwrap().bus().clone();
    let old_world = manager.active().unwrap().world().clone();
    eventually(|| old_world.snapshot().entities.tick == 50).await;

    let second_id = manager.select_replay("m-2").await.unwrap();

    assert!(first.is_closed(), "old connection closed before the new one");
    assert_eq!(old_bus.subscriber_count(), 0);
    let session = manager.active().unwrap();
    assert_eq!(session.id(), second_id);
    assert_eq!(session.snapshot(), WorldSnapshot::default());

    // The old world is unreachable from any bus now.
    let frozen = old_world.snapshot();
    old_bus.publish(tick(99));
    assert_eq!(old_world.snapshot(), frozen);

    let second = within(remotes.recv()).await.unwrap();
    second.push(tick(7));
    eventually(|| session.snapshot().entities.tick == 7).await;
}

#[tokio::test]
async fn test_reset_session_leaves_none_active() {
    let (mut manager, mut remotes, _) = manager();
    manager.select_replay("m-1").await.unwrap();
    let remote = within(remotes.recv()).await.unwrap();

    assert!(manager.reset_session().await);
    assert!(manager.active().is_none());
    assert!(remote.is_closed());
    assert!(!manager.reset_session().await);
}

#[tokio::test]
async fn test_end_session_with_stale_id_fails() {
    let (mut manager, mut remotes, _) = manager();
    let first = manager.select_replay("m-1").await.unwrap();
    let _r1 = within(remotes.recv()).await.unwrap();
    let second = manager.select_replay("m-2").await.unwrap();
    let _r2 = within(remotes.recv()).await.unwrap();

    let stale = manager.end_session(first).await;
    assert!(matches!(stale, Err(SessionError::NoActiveSession)));
    assert_eq!(manager.active().map(|s| s.id()), Some(second));

    manager.end_session(second).await.unwrap();
    assert!(manager.active().is_none());
}

// =========================================================================
// Alerts
// =========================================================================

#[tokio::test]
async fn test_server_alert_reaches_sink() {
    let (mut manager, mut remotes, alerts) = manager();
    manager.select_replay("m-1").await.unwrap();
    let remote = within(remotes.recv()).await.unwrap();

    remote.push(Message::Alert("No matchId provided".into()));

    eventually(|| alerts.lock().unwrap().len() == 1).await;
    assert_eq!(alerts.lock().unwrap()[0], "No matchId provided");
}

#[tokio::test]
async fn test_transport_failure_alerts_once_per_session() {
    let (mut manager, mut remotes, alerts) = manager();
    manager.select_replay("m-1").await.unwrap();
    let remote = within(remotes.recv()).await.unwrap();

    remote.fail();

    let session = manager.active().unwrap();
    assert_eq!(within(session.terminated()).await, ConnectionState::Errored);
    assert_eq!(alerts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_extra_subscribers_are_dropped_with_session() {
    let (mut manager, mut remotes, _) = manager();
    manager.select_replay("m-1").await.unwrap();
    let _remote = within(remotes.recv()).await.unwrap();

    let bus = manager.active().unwrap().bus().clone();
    let before = bus.subscriber_count();
    bus.subscribe(&[MessageType::Frag], |_: &Message| -> Result<(), demoscope_bus::HandlerError> {
        Ok(())
    });
    assert_eq!(bus.subscriber_count(), before + 1);

    manager.reset_session().await;
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn test_terminated_reports_clean_close_without_alert() {
    let (mut manager, mut remotes, alerts) = manager();
    manager.select_replay("m-1").await.unwrap();
    let remote = within(remotes.recv()).await.unwrap();

    remote.close(1000, "demo finished");

    let session = manager.active().unwrap();
    assert_eq!(within(session.terminated()).await, ConnectionState::Closed);
    // A second wait returns immediately with the same final state.
    assert_eq!(within(session.terminated()).await, ConnectionState::Closed);
    assert!(alerts.lock().unwrap().is_empty());
}
