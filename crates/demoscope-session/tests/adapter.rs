//! Transport adapter behaviour against an in-memory connection.

mod common;

use std::sync::{Arc, Mutex};

use common::{MockConnector, eventually, within};
use demoscope_bus::{ALERT_TAG, EventBus, HandlerError};
use demoscope_protocol::{
    DemoPlatform, Init, Message, MessageType, ReplayTarget, Shot, TickState,
};
use demoscope_session::{ConnectionState, TransportAdapter};
use tokio::sync::oneshot;

// =========================================================================
// Helpers
// =========================================================================

type Seen = Arc<Mutex<Vec<Message>>>;

/// A bus that records every message of the given tags.
fn recording_bus(tags: &[MessageType]) -> (EventBus, Seen) {
    let bus = EventBus::new();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(tags, move |msg: &Message| -> Result<(), HandlerError> {
        sink.lock().unwrap().push(msg.clone());
        Ok(())
    });
    (bus, seen)
}

fn count(seen: &Seen) -> usize {
    seen.lock().unwrap().len()
}

fn init(map: &str) -> Message {
    Message::Init(Init {
        map_name: map.into(),
        ..Init::default()
    })
}

// =========================================================================
// Play request and frame flow
// =========================================================================

#[tokio::test]
async fn test_adapter_sends_one_play_request_on_open() {
    let (connector, mut remotes) = MockConnector::new();
    let (bus, _) = recording_bus(&[]);
    let target = ReplayTarget::new("match-42", DemoPlatform::Upload).unwrap();
    let (adapter, mut state) = TransportAdapter::new(bus, target);
    let (_stop, stop_rx) = oneshot::channel();

    let task = tokio::spawn(async move { adapter.run(&connector, "ws://test", stop_rx).await });

    let mut remote = within(remotes.recv()).await.unwrap();
    let request = remote.next_sent().await;
    assert_eq!(request.msg_type, MessageType::PlayRequest as i32);
    let demo = request.demo.unwrap();
    assert_eq!(demo.match_id, "match-42");
    assert_eq!(demo.platform, DemoPlatform::Upload as i32);

    within(state.wait_for(|s| *s == ConnectionState::Open)).await.unwrap();

    remote.close(1000, "done");
    assert_eq!(within(task).await.unwrap(), ConnectionState::Closed);
    assert!(remote.sent.try_recv().is_err(), "only one outbound frame");
}

#[tokio::test]
async fn test_adapter_publishes_frames_in_arrival_order() {
    let (connector, mut remotes) = MockConnector::new();
    let (bus, seen) = recording_bus(&[MessageType::Init, MessageType::Shot]);
    let (adapter, _state) = TransportAdapter::new(bus, ReplayTarget::upload("m").unwrap());
    let (_stop, stop_rx) = oneshot::channel();
    let task = tokio::spawn(async move { adapter.run(&connector, "ws://test", stop_rx).await });

    let remote = within(remotes.recv()).await.unwrap();
    remote.push(init("de_train"));
    remote.push(Message::Shot(Shot { player_id: 1, ..Shot::default() }));
    remote.push(Message::Shot(Shot { player_id: 2, ..Shot::default() }));
    remote.close(1000, "");
    within(task).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(matches!(&seen[0], Message::Init(i) if i.map_name == "de_train"));
    assert!(matches!(&seen[2], Message::Shot(s) if s.player_id == 2));
}

#[tokio::test]
async fn test_adapter_drops_malformed_frames_and_keeps_reading() {
    let (connector, mut remotes) = MockConnector::new();
    let (bus, seen) = recording_bus(&[MessageType::Init, MessageType::Empty]);
    let (adapter, state) = TransportAdapter::new(bus, ReplayTarget::upload("m").unwrap());
    let (_stop, stop_rx) = oneshot::channel();
    let task = tokio::spawn(async move { adapter.run(&connector, "ws://test", stop_rx).await });

    let remote = within(remotes.recv()).await.unwrap();
    remote.push_raw(vec![]);
    remote.push_raw(vec![0xFF, 0xFF, 0xFF]);
    remote.push_raw(vec![0x08, 0x4D]); // unknown type 77
    remote.push(init("de_cache"));

    eventually(|| count(&seen) == 1).await;
    assert_eq!(*state.borrow(), ConnectionState::Open);

    remote.close(1000, "");
    within(task).await.unwrap();
}

/// Degraded path: the server is not known to send text frames.
#[tokio::test]
async fn test_adapter_text_frame_falls_back_to_json() {
    let (connector, mut remotes) = MockConnector::new();
    let (bus, seen) = recording_bus(&[MessageType::Init]);
    let (adapter, _state) = TransportAdapter::new(bus, ReplayTarget::upload("m").unwrap());
    let (_stop, stop_rx) = oneshot::channel();
    let task = tokio::spawn(async move { adapter.run(&connector, "ws://test", stop_rx).await });

    let remote = within(remotes.recv()).await.unwrap();
    remote.push_text("not json at all");
    remote.push_text(r#"{"msgType":4,"init":{"mapName":"de_nuke"}}"#);

    eventually(|| count(&seen) == 1).await;
    assert!(matches!(&seen.lock().unwrap()[0], Message::Init(i) if i.map_name == "de_nuke"));

    remote.close(1000, "");
    within(task).await.unwrap();
}

// =========================================================================
// Termination
// =========================================================================

#[tokio::test]
async fn test_adapter_abnormal_close_is_closed_without_alert() {
    let (connector, mut remotes) = MockConnector::new();
    let (bus, alerts) = recording_bus(&[ALERT_TAG]);
    let (adapter, _state) = TransportAdapter::new(bus, ReplayTarget::upload("m").unwrap());
    let (_stop, stop_rx) = oneshot::channel();
    let task = tokio::spawn(async move { adapter.run(&connector, "ws://test", stop_rx).await });

    let remote = within(remotes.recv()).await.unwrap();
    drop(remote);

    assert_eq!(within(task).await.unwrap(), ConnectionState::Closed);
    assert_eq!(count(&alerts), 0);
}

#[tokio::test]
async fn test_adapter_receive_error_publishes_exactly_one_alert() {
    let (connector, mut remotes) = MockConnector::new();
    let (bus, alerts) = recording_bus(&[ALERT_TAG, MessageType::TickStateUpdate]);
    let (adapter, _state) = TransportAdapter::new(bus, ReplayTarget::upload("m").unwrap());
    let (_stop, stop_rx) = oneshot::channel();
    let task = tokio::spawn(async move { adapter.run(&connector, "ws://test", stop_rx).await });

    let remote = within(remotes.recv()).await.unwrap();
    remote.fail();
    // Anything after the failure is never read.
    remote.push(Message::TickState(TickState::default()));

    assert_eq!(within(task).await.unwrap(), ConnectionState::Errored);
    let alerts = alerts.lock().unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(matches!(&alerts[0], Message::Alert(text) if text.contains("reset by peer")));
}

#[tokio::test]
async fn test_adapter_connect_failure_is_errored_with_alert() {
    let connector = MockConnector::refusing();
    let (bus, alerts) = recording_bus(&[ALERT_TAG]);
    let (adapter, state) = TransportAdapter::new(bus, ReplayTarget::upload("m").unwrap());
    let (_stop, stop_rx) = oneshot::channel();

    let end = within(adapter.run(&connector, "ws://test", stop_rx)).await;

    assert_eq!(end, ConnectionState::Errored);
    assert_eq!(*state.borrow(), ConnectionState::Errored);
    assert_eq!(count(&alerts), 1);
}

#[tokio::test]
async fn test_adapter_shutdown_closes_connection() {
    let (connector, mut remotes) = MockConnector::new();
    let (bus, alerts) = recording_bus(&[ALERT_TAG]);
    let (adapter, mut state) = TransportAdapter::new(bus, ReplayTarget::upload("m").unwrap());
    let (stop, stop_rx) = oneshot::channel();
    let task = tokio::spawn(async move { adapter.run(&connector, "ws://test", stop_rx).await });

    let remote = within(remotes.recv()).await.unwrap();
    within(state.wait_for(|s| *s == ConnectionState::Open)).await.unwrap();
    stop.send(()).unwrap();

    assert_eq!(within(task).await.unwrap(), ConnectionState::Closed);
    assert!(remote.is_closed());
    assert_eq!(count(&alerts), 0);
}
