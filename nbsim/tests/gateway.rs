use std::time::Duration;

use axum::body::Body as HttpBody;
use axum::http::{Request, StatusCode};
use nbsim::{build_router, AppState, Broadcaster, Parameters, ProtocolError, RunnerState, Snapshot, SnapshotSink};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tower::ServiceExt;

fn app_state() -> AppState {
    let params = Parameters {
        seed: Some(3),
        ..Parameters::default()
    };
    AppState::new(params, 64)
}

async fn next_with_len(rx: &mut tokio::sync::broadcast::Receiver<Snapshot>, n: usize) -> Snapshot {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match rx.recv().await {
                Ok(snapshot) if snapshot.bodies().unwrap().len() == n => return snapshot,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("broadcast closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for snapshot")
}

// ==================================================================================
// Gateway
// ==================================================================================

#[tokio::test]
async fn idle_viewer_is_welcomed_with_empty_array() {
    let state = app_state();
    assert_eq!(state.gateway.welcome().as_str(), "[]");
}

#[tokio::test]
async fn start_update_stop_through_gateway() {
    let state = app_state();
    let mut viewer = state.broadcaster.subscribe();

    state
        .gateway
        .handle_message(r#"{"action":"start","numBodies":10,"gravity":1.0}"#)
        .unwrap();
    let status = state.runner.status();
    assert_eq!(status.state, RunnerState::Running);
    assert_eq!(status.bodies, 10);
    assert!((status.gravity_scale - 667.43).abs() < 0.1);
    next_with_len(&mut viewer, 10).await;

    // a late joiner sees the running population straight away
    assert_eq!(state.gateway.welcome().bodies().unwrap().len(), 10);

    state
        .gateway
        .handle_message(r#"{"action":"update","numBodies":20,"gravity":2.0}"#)
        .unwrap();
    let status = state.runner.status();
    assert_eq!(status.bodies, 20);
    assert!((status.gravity_scale - 1334.86).abs() < 0.1);
    next_with_len(&mut viewer, 20).await;

    state.gateway.handle_message(r#"{"action":"stop"}"#).unwrap();
    assert_eq!(state.runner.state(), RunnerState::Idle);
    assert_eq!(state.gateway.welcome().as_str(), "[]");

    // drain what was in flight, then nothing more arrives
    while viewer.try_recv().is_ok() {}
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(matches!(viewer.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn start_defaults_to_five_bodies() {
    let state = app_state();
    state.gateway.handle_message(r#"{"action":"start","gravity":1.0}"#).unwrap();
    assert_eq!(state.runner.status().bodies, 5);
    state.runner.stop();
}

#[tokio::test]
async fn float_and_oversized_counts_are_clamped() {
    let state = app_state();
    state
        .gateway
        .handle_message(r#"{"action":"start","numBodies":10.0,"gravity":1}"#)
        .unwrap();
    assert_eq!(state.runner.status().bodies, 10);

    state
        .gateway
        .handle_message(r#"{"action":"update","numBodies":99999999999999999999,"gravity":1}"#)
        .unwrap();
    assert_eq!(state.runner.status().bodies, 1000);

    state
        .gateway
        .handle_message(r#"{"action":"update","numBodies":-1e30,"gravity":1}"#)
        .unwrap();
    assert_eq!(state.runner.status().bodies, 0);
    state.runner.stop();
}

#[tokio::test]
async fn unknown_action_reports_and_changes_nothing() {
    let state = app_state();
    state
        .gateway
        .handle_message(r#"{"action":"start","numBodies":4,"gravity":1.0}"#)
        .unwrap();

    let err = state.gateway.handle_message(r#"{"action":"invalid"}"#).unwrap_err();
    assert_eq!(err, ProtocolError::UnknownAction("invalid".into()));

    let status = state.runner.status();
    assert_eq!(status.state, RunnerState::Running);
    assert_eq!(status.bodies, 4);
    state.runner.stop();
}

#[tokio::test]
async fn malformed_message_reports_invalid_format() {
    let state = app_state();
    for text in ["not json", r#"{"action":"update","gravity":1.0}"#, r#"{"action":"start"}"#] {
        let err = state.gateway.handle_message(text).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidFormat);
        assert_eq!(err.to_string(), "Invalid message format");
    }
    assert_eq!(state.runner.state(), RunnerState::Idle);
    assert_eq!(state.runner.status().bodies, 0);
}

// ==================================================================================
// Broadcaster
// ==================================================================================

#[tokio::test]
async fn broadcaster_fans_out_to_every_viewer() {
    let broadcaster = Broadcaster::new(8);
    let mut a = broadcaster.subscribe();
    let mut b = broadcaster.subscribe();
    assert_eq!(broadcaster.viewer_count(), 2);

    broadcaster.deliver(&Snapshot::empty());
    assert_eq!(a.recv().await.unwrap().as_str(), "[]");
    assert_eq!(b.recv().await.unwrap().as_str(), "[]");

    drop(a);
    assert_eq!(broadcaster.viewer_count(), 1);
}

#[tokio::test]
async fn broadcaster_without_viewers_drops_silently() {
    let broadcaster = Broadcaster::new(0);
    broadcaster.deliver(&Snapshot::empty());
    assert_eq!(broadcaster.viewer_count(), 0);
}

#[tokio::test]
async fn slow_viewer_lags_instead_of_blocking() {
    let broadcaster = Broadcaster::new(2);
    let mut slow = broadcaster.subscribe();
    for _ in 0..5 {
        broadcaster.deliver(&Snapshot::empty());
    }
    assert!(matches!(slow.recv().await, Err(RecvError::Lagged(3))));
    assert!(slow.recv().await.is_ok());
    assert!(slow.recv().await.is_ok());
    assert!(matches!(slow.try_recv(), Err(TryRecvError::Empty)));
}

// ==================================================================================
// Routes
// ==================================================================================

#[tokio::test]
async fn status_route_reports_idle_simulation() {
    let app = build_router(app_state(), "/simulation");
    let response = app
        .oneshot(Request::builder().uri("/status").body(HttpBody::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["state"], "idle");
    assert_eq!(json["bodies"], 0);
    assert_eq!(json["gravity_scale"], 0.0);
    assert_eq!(json["viewers"], 0);
}

#[tokio::test]
async fn simulation_route_requires_websocket_upgrade() {
    let app = build_router(app_state(), "simulation");
    let response = app
        .oneshot(Request::builder().uri("/simulation").body(HttpBody::empty()).unwrap())
        .await
        .unwrap();
    assert!(!response.status().is_success());
    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}
