//! Connection registry: ID-keyed records with per-connection relay state.

use std::collections::HashMap;

use huddle_wire::{ConnectionId, ServerMessage};
use tracing::debug;

use crate::handle::ClientHandle;

/// Returned by [`ConnectionRegistry::register`] when the ID is taken.
///
/// Identifiers are UUID-strength, so hitting this indicates a caller bug
/// (registering the same connection twice), not a collision.
#[derive(Debug, thiserror::Error)]
#[error("connection {0} is already registered")]
pub struct AlreadyRegistered(pub ConnectionId);

/// One registered connection: its transport handle and current partner.
#[derive(Debug)]
pub struct ConnectionRecord {
    handle: ClientHandle,
    partner: Option<ConnectionId>,
}

impl ConnectionRecord {
    /// The partner this connection is currently paired with, if any.
    pub fn partner(&self) -> Option<&ConnectionId> {
        self.partner.as_ref()
    }
}

/// Map from connection ID to live connection record.
///
/// Exclusive owner of all per-connection relay state. Not internally
/// locked: the [`Relay`](crate::relay::Relay) context serializes access so
/// multi-step sequences (pairing, teardown) stay indivisible.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    records: HashMap<ConnectionId, ConnectionRecord>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection with no partner.
    pub fn register(&mut self, handle: ClientHandle) -> Result<(), AlreadyRegistered> {
        let id = handle.id().clone();
        if self.records.contains_key(&id) {
            return Err(AlreadyRegistered(id));
        }
        let _ = self.records.insert(
            id,
            ConnectionRecord {
                handle,
                partner: None,
            },
        );
        Ok(())
    }

    /// Look up a connection record.
    pub fn lookup(&self, id: &ConnectionId) -> Option<&ConnectionRecord> {
        self.records.get(id)
    }

    /// Whether the connection is registered and its transport is open.
    pub fn is_open(&self, id: &ConnectionId) -> bool {
        self.records.get(id).is_some_and(|r| r.handle.is_open())
    }

    /// Remove and return a connection record.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<ConnectionRecord> {
        self.records.remove(id)
    }

    /// Set or clear a connection's partner. Last write wins.
    ///
    /// Returns `false` if the connection is not registered.
    pub fn set_partner(&mut self, id: &ConnectionId, partner: Option<ConnectionId>) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                record.partner = partner;
                true
            }
            None => false,
        }
    }

    /// The partner of a connection, if registered and paired.
    pub fn partner_of(&self, id: &ConnectionId) -> Option<ConnectionId> {
        self.records.get(id).and_then(|r| r.partner.clone())
    }

    /// Serialize and enqueue a message for the named connection.
    ///
    /// Best-effort: returns `false` if the connection is unknown or its
    /// channel rejects the message.
    pub fn send_to(&self, id: &ConnectionId, message: &ServerMessage) -> bool {
        match self.records.get(id) {
            Some(record) => record.handle.send(message),
            None => {
                debug!(conn_id = %id, "send to unregistered connection dropped");
                false
            }
        }
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
