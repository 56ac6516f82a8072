//! Pairing engine: match a waiting connection against the queue head.

use huddle_wire::{ConnectionId, ServerMessage};
use tracing::{debug, info};

use crate::relay::RelayState;

/// Handle a `waiting` request from `requester`.
///
/// Pops the queue front and pairs with it if it is still live. A stale
/// front entry is discarded without trying the next one: the requester is
/// enqueued instead, and the cycle relies on later `waiting` requests and
/// the sweeper. A requester that is already queued stays where it is.
pub(crate) fn pair_or_enqueue(state: &mut RelayState, requester: &ConnectionId) {
    if state.queue.contains(requester) {
        debug!(conn_id = %requester, "already waiting, request ignored");
        return;
    }

    let Some(candidate) = state.queue.dequeue_front() else {
        let _ = state.queue.enqueue(requester.clone());
        debug!(conn_id = %requester, "queue empty, now waiting");
        return;
    };

    if !state.registry.is_open(&candidate) {
        // No scan past a stale candidate: give up and wait.
        debug!(conn_id = %requester, stale = %candidate, "front candidate gone, now waiting");
        let _ = state.queue.enqueue(requester.clone());
        return;
    }

    let _ = state
        .registry
        .set_partner(requester, Some(candidate.clone()));
    let _ = state
        .registry
        .set_partner(&candidate, Some(requester.clone()));

    let _ = state.registry.send_to(
        requester,
        &ServerMessage::Paired {
            partner_id: candidate.clone(),
        },
    );
    let _ = state.registry.send_to(
        &candidate,
        &ServerMessage::Paired {
            partner_id: requester.clone(),
        },
    );
    info!(a = %requester, b = %candidate, "paired");
}
