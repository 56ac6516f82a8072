//! WebSocket session lifecycle — handles a single connected client from
//! upgrade through disconnect.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use huddle_relay::{ClientHandle, Relay};
use huddle_wire::ConnectionId;
use metrics::{counter, gauge};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::metrics::{
    RELAY_MESSAGES_TOTAL, WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL,
};

/// Keepalive probe, pre-serialized. The wire contract pins the JSON form;
/// clients answer with `{"type":"pong"}`.
const PING_FRAME: &str = r#"{"type":"ping"}"#;

/// Run a WebSocket session for a connected client.
///
/// 1. Mints a connection identifier and registers it with the relay
///    (which greets the client with `welcome`)
/// 2. Forwards relay output and periodic `ping` probes to the socket
/// 3. Feeds incoming text frames into the relay router
/// 4. On disconnect, tears the connection down atomically and stops the
///    keepalive, whichever side initiated the close
#[instrument(skip_all, fields(conn_id))]
pub async fn run_ws_session(
    ws: WebSocket,
    relay: Arc<Relay>,
    ping_interval: Duration,
    send_queue_capacity: usize,
) {
    let conn_id = ConnectionId::new();
    let _ = tracing::Span::current().record("conn_id", conn_id.as_str());

    let (mut ws_tx, mut ws_rx) = ws.split();
    let (send_tx, mut send_rx) = mpsc::channel::<String>(send_queue_capacity);

    if let Err(e) = relay.register(ClientHandle::new(conn_id.clone(), send_tx)) {
        warn!(error = %e, "could not register connection, dropping");
        return;
    }
    info!("client connected");
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);

    // Outbound forwarder with periodic keepalive probes. Aborted on
    // disconnect, so the probe timer cannot outlive the connection.
    let outbound = tokio::spawn(async move {
        let mut ping = tokio::time::interval(ping_interval);
        // Skip the immediate first tick
        let _ = ping.tick().await;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping.tick() => {
                    if ws_tx.send(Message::Text(PING_FRAME.into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Process incoming frames until the client goes away.
    while let Some(Ok(msg)) = ws_rx.next().await {
        let text = match msg {
            Message::Text(ref t) => Some(t.to_string()),
            Message::Binary(ref data) => {
                if let Ok(s) = std::str::from_utf8(data) {
                    Some(s.to_string())
                } else {
                    info!(len = data.len(), "received non-UTF8 binary frame");
                    None
                }
            }
            Message::Close(_) => {
                info!("client sent close frame");
                break;
            }
            // Protocol-level frames; liveness rides on the JSON ping/pong.
            Message::Ping(_) | Message::Pong(_) => None,
        };

        let Some(text) = text else { continue };
        counter!(RELAY_MESSAGES_TOTAL).increment(1);
        relay.handle_message(&conn_id, &text);
    }

    info!("client disconnected");
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);

    relay.disconnect(&conn_id);
    outbound.abort();
}

#[cfg(test)]
mod tests {
    // Full session behavior needs a real WebSocket pair and is covered by
    // tests/integration.rs. Unit tests here pin the keepalive frame shape.

    use super::PING_FRAME;
    use huddle_wire::ServerMessage;

    #[test]
    fn ping_frame_matches_wire_contract() {
        let parsed: serde_json::Value = serde_json::from_str(PING_FRAME).unwrap();
        assert_eq!(parsed, serde_json::json!({"type": "ping"}));
    }

    #[test]
    fn ping_frame_matches_server_message_encoding() {
        let encoded = serde_json::to_string(&ServerMessage::Ping).unwrap();
        assert_eq!(encoded, PING_FRAME);
    }
}
