//! HTTP routes: the viewer websocket and an operator status endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::server::broadcast::Broadcaster;
use crate::server::gateway::CommandGateway;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::runner::{RunnerStatus, SimulationRunner};

/// Everything a request handler needs; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<SimulationRunner>,
    pub gateway: Arc<CommandGateway>,
    pub broadcaster: Arc<Broadcaster>,
    next_viewer: Arc<AtomicU64>,
}

impl AppState {
    /// Wire an idle simulation to a fresh broadcaster
    pub fn new(params: Parameters, broadcast_capacity: usize) -> Self {
        let broadcaster = Arc::new(Broadcaster::new(broadcast_capacity));
        let runner = Arc::new(SimulationRunner::new(Engine::new(params), broadcaster.clone()));
        let gateway = Arc::new(CommandGateway::new(Arc::clone(&runner)));
        Self {
            runner,
            gateway,
            broadcaster,
            next_viewer: Arc::new(AtomicU64::new(1)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub runner: RunnerStatus,
    pub viewers: usize,
}

/// Build the router with the websocket mounted at `ws_path`
pub fn build_router(state: AppState, ws_path: &str) -> Router {
    let ws_path = if ws_path.starts_with('/') {
        ws_path.to_string()
    } else {
        format!("/{ws_path}")
    };
    Router::new()
        .route(&ws_path, get(simulation_socket))
        .route("/status", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let runner = {
        let runner = Arc::clone(&state.runner);
        // status takes the engine lock, which a tick may hold briefly
        match tokio::task::spawn_blocking(move || runner.status()).await {
            Ok(status) => status,
            Err(err) => {
                error!(%err, "status task failed");
                state.runner.status()
            }
        }
    };
    Json(StatusResponse {
        runner,
        viewers: state.broadcaster.viewer_count(),
    })
}

async fn simulation_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| viewer_session(socket, state))
}

/// One connected viewer: welcome snapshot, then broadcast pushes and
/// inbound commands until either side goes away.
async fn viewer_session(mut socket: WebSocket, state: AppState) {
    let viewer = state.next_viewer.fetch_add(1, Ordering::Relaxed);
    // subscribe before reading the welcome snapshot so no tick falls in the gap
    let mut updates = state.broadcaster.subscribe();
    info!(viewer, viewers = state.broadcaster.viewer_count(), "viewer connected");

    let welcome = state.gateway.welcome();
    if socket.send(Message::Text(welcome.to_string())).await.is_err() {
        info!(viewer, "viewer left before welcome");
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(snapshot) => {
                    if socket.send(Message::Text(snapshot.to_string())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(viewer, skipped, "viewer lagging, skipped snapshots");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let gateway = Arc::clone(&state.gateway);
                    match tokio::task::spawn_blocking(move || gateway.handle_message(&text)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(notice)) => {
                            if socket.send(Message::Text(notice.to_string())).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => error!(viewer, %err, "command task failed"),
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!(viewer, %err, "viewer socket error");
                    break;
                }
            },
        }
    }

    info!(viewer, "viewer disconnected");
}
