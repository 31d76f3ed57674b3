//! Integration tests for the notification-to-command pipeline
//!
//! These tests drive the public API end to end: raw level notifications go
//! in through the monitoring channel, gestures come out on the broadcast,
//! and directional commands land on the transport. Timing is deterministic
//! via the paused test clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use presenter_bridge::gesture::Direction;
use presenter_bridge::source::{LevelNotification, LevelSource, StubLevelSource};
use presenter_bridge::transport::{RecordingTransport, Transport};
use presenter_bridge::{BridgeConfig, BridgeHandle, GestureEvent};

fn build_bridge(config: BridgeConfig) -> (Arc<StubLevelSource>, Arc<RecordingTransport>, BridgeHandle) {
    let source = Arc::new(StubLevelSource::new(0, 15, 7));
    let transport = Arc::new(RecordingTransport::new());
    let bridge = BridgeHandle::new(
        Arc::clone(&source) as Arc<dyn LevelSource>,
        Arc::clone(&transport) as Arc<dyn Transport>,
        config,
    )
    .expect("bridge must construct inside a runtime");
    (source, transport, bridge)
}

/// Deliver the two raw notifications one physical press produces.
async fn press(source: &StubLevelSource, tx: &mpsc::Sender<LevelNotification>, delta: i32) {
    source.step(delta);
    tx.send(LevelNotification::broadcast()).await.unwrap();
    tx.send(LevelNotification::broadcast()).await.unwrap();
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(400)).await;
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<GestureEvent>) -> Vec<GestureEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Test the complete single-press pipeline
///
/// Test steps:
/// 1. Start monitoring on a fresh bridge
/// 2. Deliver one up press (two raw notifications)
/// 3. Wait out the double-press window
/// 4. Verify gesture order: direction, press count, release
/// 5. Verify the transport saw exactly the up command
#[tokio::test(start_paused = true)]
async fn test_single_press_pipeline() {
    let (source, transport, bridge) = build_bridge(BridgeConfig::default());
    let mut gestures = bridge.subscribe();

    let (tx, rx) = mpsc::channel(16);
    bridge.start_monitoring(rx).unwrap();

    press(&source, &tx, 1).await;
    settle().await;

    assert_eq!(
        drain(&mut gestures),
        vec![
            GestureEvent::DirectionChanged(Direction::Up),
            GestureEvent::SinglePress,
            GestureEvent::DirectionChanged(Direction::Release),
        ]
    );
    assert_eq!(transport.sent(), vec![vec![0x01]]);
}

/// Two presses inside the 350ms window collapse into one double-press burst.
#[tokio::test(start_paused = true)]
async fn test_double_press_within_window() {
    let (source, transport, bridge) = build_bridge(BridgeConfig::default());
    let mut gestures = bridge.subscribe();

    let (tx, rx) = mpsc::channel(16);
    bridge.start_monitoring(rx).unwrap();

    press(&source, &tx, -1).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    press(&source, &tx, -1).await;
    settle().await;

    let observed = drain(&mut gestures);
    assert!(
        observed.contains(&GestureEvent::DoublePress),
        "expected DoublePress in {observed:?}"
    );
    assert_eq!(
        observed
            .iter()
            .filter(|e| matches!(e, GestureEvent::DirectionChanged(Direction::Release)))
            .count(),
        1,
        "a burst releases exactly once"
    );
    // Both level drops forward the down command; releases are not forwarded
    // by default.
    assert_eq!(transport.sent(), vec![vec![0x02], vec![0x02]]);
}

/// Two presses separated by more than the window are independent bursts.
#[tokio::test(start_paused = true)]
async fn test_presses_outside_window_stay_separate() {
    let (source, _transport, bridge) = build_bridge(BridgeConfig::default());
    let mut gestures = bridge.subscribe();

    let (tx, rx) = mpsc::channel(16);
    bridge.start_monitoring(rx).unwrap();

    press(&source, &tx, 1).await;
    settle().await;
    press(&source, &tx, 1).await;
    settle().await;

    let singles = drain(&mut gestures)
        .into_iter()
        .filter(|e| *e == GestureEvent::SinglePress)
        .count();
    assert_eq!(singles, 2, "each isolated press classifies on its own");
}

/// Test monitoring lifecycle guarantees
///
/// Test steps:
/// 1. Start monitoring, verify a second start is rejected
/// 2. Stop monitoring, verify a second stop is a quiet no-op
/// 3. Restart with a fresh channel and verify the pipeline still works
#[tokio::test(start_paused = true)]
async fn test_monitoring_lifecycle() {
    let (source, transport, bridge) = build_bridge(BridgeConfig::default());

    let (_tx, rx) = mpsc::channel(16);
    bridge.start_monitoring(rx).unwrap();
    let (_tx2, rx2) = mpsc::channel(16);
    assert!(
        bridge.start_monitoring(rx2).is_err(),
        "second start must be rejected while running"
    );

    bridge.stop_monitoring();
    bridge.stop_monitoring();
    assert!(!bridge.is_monitoring());

    let (tx3, rx3) = mpsc::channel(16);
    bridge.start_monitoring(rx3).unwrap();
    press(&source, &tx3, 1).await;
    settle().await;
    assert_eq!(transport.sent(), vec![vec![0x01]]);
}

/// Dropping the bridge mid-burst aborts the workers without emitting more
/// gestures to surviving subscribers.
#[tokio::test(start_paused = true)]
async fn test_drop_stops_pipeline() {
    let (source, transport, bridge) = build_bridge(BridgeConfig::default());

    let (tx, rx) = mpsc::channel(16);
    bridge.start_monitoring(rx).unwrap();
    press(&source, &tx, 1).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(transport.sent(), vec![vec![0x01]]);

    drop(bridge);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(
        transport.sent(),
        vec![vec![0x01]],
        "no commands may surface after drop"
    );
}
