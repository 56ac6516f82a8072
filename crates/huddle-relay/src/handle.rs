//! Per-connection transport send capability.

use huddle_wire::{ConnectionId, ServerMessage};
use tokio::sync::mpsc;
use tracing::warn;

/// The relay's view of one live transport connection.
///
/// Wraps the send half of the channel feeding the connection's writer task.
/// Sends are fire-and-forget: a full or closed channel drops the message,
/// which is the required best-effort behavior for a peer that is closing.
#[derive(Clone, Debug)]
pub struct ClientHandle {
    id: ConnectionId,
    tx: mpsc::Sender<String>,
}

impl ClientHandle {
    /// Create a handle from a connection ID and its outbound channel.
    pub fn new(id: ConnectionId, tx: mpsc::Sender<String>) -> Self {
        Self { id, tx }
    }

    /// The connection this handle addresses.
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Whether the transport side is still accepting messages.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Serialize and enqueue a message for this connection.
    ///
    /// Returns `false` if the message could not be enqueued (channel full
    /// or closed) or could not be serialized.
    pub fn send(&self, message: &ServerMessage) -> bool {
        let json = match serde_json::to_string(message) {
            Ok(j) => j,
            Err(e) => {
                warn!(conn_id = %self.id, error = %e, "failed to serialize outbound message");
                return false;
            }
        };
        self.tx.try_send(json).is_ok()
    }
}
