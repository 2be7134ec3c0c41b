//! One synchronization session per WebSocket connection.

use gridsync_core::{Grid, GridError, ServerMessage, SyncSession};
use tracing::{debug, warn};

/// A connection's grid session and the frames it exchanges.
pub struct HostedSession {
    id: String,
    session: SyncSession,
}

impl HostedSession {
    pub fn new(id: String, grid: Grid) -> Self {
        Self {
            id,
            session: SyncSession::new(grid),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the grid has been disposed; no further frames are accepted.
    pub fn is_terminated(&self) -> bool {
        self.session.is_terminated()
    }

    /// Render the current grid state without any client input.
    pub fn initial(&mut self) -> ServerMessage {
        self.run(None)
    }

    /// Handle one client text frame as one interaction cycle.
    pub fn handle_frame(&mut self, text: &str) -> ServerMessage {
        self.run(Some(text))
    }

    fn run(&mut self, frame: Option<&str>) -> ServerMessage {
        let mut cycle = match self.session.begin_cycle() {
            Ok(cycle) => cycle,
            Err(err) => return error_message(&self.id, &err),
        };
        if let Some(text) = frame {
            if let Err(err) = cycle.apply_json(text) {
                // Dropping the cycle keeps the last committed base intact.
                return error_message(&self.id, &err);
            }
        }
        let output = cycle.render();
        for event in &output.events {
            debug!("Session {} raised {:?}", self.id, event);
        }
        ServerMessage::Operations {
            cycle: self.session.rendered_cycles().saturating_sub(1),
            operations: output.operations,
        }
    }
}

fn error_message(session: &str, err: &GridError) -> ServerMessage {
    warn!("Rejected batch for session {}: {}", session, err);
    ServerMessage::Error {
        message: err.to_string(),
    }
}
