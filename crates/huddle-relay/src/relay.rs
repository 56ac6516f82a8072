//! The `Relay` context: shared state plus the connection lifecycle.
//!
//! One `Relay` exists per process, constructed at startup and handed to the
//! transport layer and the sweeper. Registry and queue live behind a single
//! mutex; each transport event (open, message, close) takes the lock once
//! and runs to completion, so no event can observe a pairing or a teardown
//! half-applied. The lock is never held across an await: all outbound
//! sends are synchronous `try_send`s into per-connection channels.

use huddle_wire::{ClientMessage, ConnectionId, ServerMessage};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::handle::ClientHandle;
use crate::queue::WaitingQueue;
use crate::registry::{AlreadyRegistered, ConnectionRegistry};
use crate::router;

/// Registry and queue under one lock.
#[derive(Debug, Default)]
pub(crate) struct RelayState {
    pub(crate) registry: ConnectionRegistry,
    pub(crate) queue: WaitingQueue,
}

/// Process-wide relay context.
#[derive(Debug, Default)]
pub struct Relay {
    state: Mutex<RelayState>,
}

impl Relay {
    /// Create a relay with no connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly opened connection and greet it.
    ///
    /// Sends `welcome` carrying the connection's own identifier as the
    /// first message on the wire.
    pub fn register(&self, handle: ClientHandle) -> Result<(), AlreadyRegistered> {
        let id = handle.id().clone();
        let state = &mut *self.state.lock();
        state.registry.register(handle)?;
        let _ = state
            .registry
            .send_to(&id, &ServerMessage::Welcome { id: id.clone() });
        info!(conn_id = %id, "connection registered");
        Ok(())
    }

    /// Tear down a closed connection.
    ///
    /// Removes it from the registry and the waiting queue; if it was
    /// paired, notifies the partner and nulls the partner's relation. All
    /// three effects happen under one lock acquisition.
    pub fn disconnect(&self, id: &ConnectionId) {
        let state = &mut *self.state.lock();
        let removed = state.registry.remove(id);
        state.queue.remove(id);

        let Some(record) = removed else {
            debug!(conn_id = %id, "disconnect for unknown connection");
            return;
        };
        info!(conn_id = %id, "connection removed");

        if let Some(partner) = record.partner() {
            if state.registry.is_open(partner) {
                let _ = state.registry.send_to(
                    partner,
                    &ServerMessage::Disconnected { from: id.clone() },
                );
            }
            let _ = state.registry.set_partner(partner, None);
        }
    }

    /// Handle one raw inbound frame from the named connection.
    ///
    /// Undecodable input earns the sender a single `error` reply and
    /// nothing else; decoded messages go through the router.
    pub fn handle_message(&self, sender: &ConnectionId, raw: &str) {
        let message: ClientMessage = match serde_json::from_str(raw) {
            Ok(m) => m,
            Err(e) => {
                warn!(conn_id = %sender, error = %e, "undecodable message");
                let state = self.state.lock();
                let _ = state
                    .registry
                    .send_to(sender, &ServerMessage::error(format!("invalid message: {e}")));
                return;
            }
        };
        debug!(conn_id = %sender, kind = message.kind(), "dispatching message");
        let state = &mut *self.state.lock();
        router::dispatch(state, sender, message);
    }

    /// Prune waiting-queue entries whose connection is gone or not open.
    ///
    /// Returns the number of entries removed. Never touches paired
    /// connections or the registry itself.
    pub fn sweep_stale(&self) -> usize {
        let state = &mut *self.state.lock();
        let RelayState { registry, queue } = state;
        queue.sweep_stale(|id| registry.is_open(id))
    }

    /// Number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    /// Number of connections awaiting a partner.
    pub fn waiting_count(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// The current partner of a connection, if any. Test and health probe
    /// accessor; routing goes through [`Self::handle_message`].
    pub fn partner_of(&self, id: &ConnectionId) -> Option<ConnectionId> {
        self.state.lock().registry.partner_of(id)
    }
}
