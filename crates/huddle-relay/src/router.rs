//! Message router: validate decoded messages and forward relay kinds.

use huddle_wire::{ClientMessage, ConnectionId, ServerMessage};
use serde_json::Value;
use tracing::debug;

use crate::pairing;
use crate::relay::RelayState;

/// The four kinds that carry an opaque payload to a destination.
#[derive(Clone, Copy, Debug)]
enum ForwardKind {
    Offer,
    Answer,
    IceCandidate,
    Chat,
}

impl ForwardKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "iceCandidate",
            Self::Chat => "message",
        }
    }

    fn wrap(self, from: ConnectionId, payload: Value) -> ServerMessage {
        match self {
            Self::Offer => ServerMessage::Offer { from, payload },
            Self::Answer => ServerMessage::Answer { from, payload },
            Self::IceCandidate => ServerMessage::IceCandidate { from, payload },
            Self::Chat => ServerMessage::Message { from, payload },
        }
    }
}

/// Route one decoded message from `sender`.
///
/// Every message kind is handled here; the compiler keeps this match
/// exhaustive as kinds are added.
pub(crate) fn dispatch(state: &mut RelayState, sender: &ConnectionId, message: ClientMessage) {
    match message {
        ClientMessage::Waiting => pairing::pair_or_enqueue(state, sender),
        ClientMessage::Offer { to, payload } => {
            forward(state, sender, ForwardKind::Offer, to, payload);
        }
        ClientMessage::Answer { to, payload } => {
            forward(state, sender, ForwardKind::Answer, to, payload);
        }
        ClientMessage::IceCandidate { to, payload } => {
            forward(state, sender, ForwardKind::IceCandidate, to, payload);
        }
        ClientMessage::Message { to, payload } => {
            forward(state, sender, ForwardKind::Chat, to, payload);
        }
        ClientMessage::EndChat { to } => end_chat(state, sender, to),
        ClientMessage::Pong => {
            debug!(conn_id = %sender, "pong received");
        }
    }
}

/// Validate and forward a relay message. Contract violations earn the
/// sender an `error` reply; an unreachable destination is a silent drop.
fn forward(
    state: &mut RelayState,
    sender: &ConnectionId,
    kind: ForwardKind,
    to: Option<ConnectionId>,
    payload: Option<Value>,
) {
    let Some(to) = to else {
        reject(state, sender, format!("{} requires a 'to' field", kind.tag()));
        return;
    };
    let Some(payload) = payload else {
        reject(
            state,
            sender,
            format!("{} requires a 'payload' field", kind.tag()),
        );
        return;
    };
    if matches!(kind, ForwardKind::Chat) && !has_text(&payload) {
        reject(
            state,
            sender,
            "message payload requires a non-empty 'text' field",
        );
        return;
    }

    if !state.registry.is_open(&to) {
        // Best effort: the destination may have just disconnected.
        debug!(conn_id = %sender, to = %to, kind = kind.tag(), "destination not open, dropped");
        return;
    }
    let _ = state
        .registry
        .send_to(&to, &kind.wrap(sender.clone(), payload));
}

/// `endChat`: drop the sender's own wait and notify the destination.
///
/// The partner relation on both sides is left intact; it dissolves on a
/// real close event or gets overwritten by a later pairing.
fn end_chat(state: &mut RelayState, sender: &ConnectionId, to: Option<ConnectionId>) {
    let Some(to) = to else {
        reject(state, sender, "endChat requires a 'to' field");
        return;
    };

    state.queue.remove(sender);

    if state.registry.is_open(&to) {
        let _ = state.registry.send_to(
            &to,
            &ServerMessage::ChatEnded {
                from: sender.clone(),
            },
        );
    } else {
        debug!(conn_id = %sender, to = %to, "chatEnded destination not open, skipped");
    }
}

fn has_text(payload: &Value) -> bool {
    payload
        .get("text")
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty())
}

fn reject(state: &RelayState, sender: &ConnectionId, message: impl Into<String>) {
    let reason = message.into();
    debug!(conn_id = %sender, reason = %reason, "message rejected");
    let _ = state.registry.send_to(sender, &ServerMessage::error(reason));
}
