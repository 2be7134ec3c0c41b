//! GridSync WebSocket Server
//!
//! Hosts one grid synchronization session per connection. The server sends
//! the initial render as soon as the socket opens; after that every client
//! text frame is one interaction cycle and gets exactly one reply.
//!
//! ## Protocol
//!
//! Client frames carry a batch of messages:
//! ```json
//! { "messages": [
//!     { "op": "call", "id": "w3", "method": "move", "params": { "left": 40 } },
//!     { "op": "notify", "id": "w1", "event": "expand", "params": { "item": "w9" } },
//!     { "op": "set", "id": "w1", "properties": { "selection": ["w9"] } }
//! ] }
//! ```
//!
//! Server frames are either a rendered cycle or an error:
//! ```json
//! { "type": "operations", "cycle": 1, "operations": [
//!     { "op": "set", "id": "w3", "property": "left", "value": 0 }
//! ] }
//! { "type": "error", "message": "Malformed input for w3.left: missing" }
//! ```

mod config;
mod demo;
mod session;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use gridsync_core::{GridTheme, ServerMessage};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::demo::demo_grid;
use crate::session::HostedSession;

/// Bookkeeping for a live connection
struct SessionInfo {
    connected_at: Instant,
    cycles: u64,
}

/// Shared application state
struct AppState {
    /// Live sessions by connection id
    sessions: DashMap<String, SessionInfo>,
    theme: GridTheme,
}

impl AppState {
    fn new(theme: GridTheme) -> Self {
        Self {
            sessions: DashMap::new(),
            theme,
        }
    }

    fn register(&self, id: &str) {
        self.sessions.insert(
            id.to_string(),
            SessionInfo {
                connected_at: Instant::now(),
                cycles: 0,
            },
        );
    }

    fn record_cycle(&self, id: &str) {
        if let Some(mut info) = self.sessions.get_mut(id) {
            info.cycles += 1;
        }
    }

    fn unregister(&self, id: &str) {
        if let Some((_, info)) = self.sessions.remove(id) {
            info!(
                "Session {} closed after {} cycles ({:.1?})",
                id,
                info.cycles,
                info.connected_at.elapsed()
            );
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridsync_server=info,gridsync_core=info,tower_http=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(config.theme));

    let app = Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/sessions", get(sessions))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("GridSync server listening on {}", config.addr);
    info!("WebSocket endpoint: ws://{}/ws", config.addr);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {}: {}", config.addr, err);
            std::process::exit(1);
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
}

/// Index page
async fn index() -> &'static str {
    "GridSync Server - Connect via WebSocket at /ws"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Number of live sessions
async fn sessions(State(state): State<Arc<AppState>>) -> String {
    state.sessions.len().to_string()
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let id = Uuid::new_v4().to_string();
    let grid = match demo_grid(state.theme.clone()) {
        Ok(grid) => grid,
        Err(err) => {
            error!("Failed to build grid for {}: {}", id, err);
            return;
        }
    };
    info!("New connection: {}", id);
    state.register(&id);

    let mut session = HostedSession::new(id.clone(), grid);
    let (mut sender, mut receiver) = socket.split();

    let initial = session.initial();
    if send(&mut sender, &initial).await {
        state.record_cycle(&id);
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let reply = session.handle_frame(&text);
                    if matches!(reply, ServerMessage::Operations { .. }) {
                        state.record_cycle(&id);
                    }
                    if !send(&mut sender, &reply).await || session.is_terminated() {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    let reply = ServerMessage::Error {
                        message: "Binary frames are not supported".into(),
                    };
                    if !send(&mut sender, &reply).await {
                        break;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {} // Ignore ping/pong
                Err(e) => {
                    warn!("WebSocket error for {}: {}", session.id(), e);
                    break;
                }
            }
        }
    }

    state.unregister(&id);
    info!("Connection closed: {}", id);
}

/// Send a server message; false when the socket is gone.
async fn send<S>(sender: &mut S, message: &ServerMessage) -> bool
where
    S: SinkExt<Message> + Unpin,
{
    let json = match message.to_json() {
        Ok(json) => json,
        Err(err) => {
            error!("Failed to encode message: {}", err);
            return false;
        }
    };
    sender.send(Message::Text(json.into())).await.is_ok()
}
