//! Tagged message enums for the client/server wire contract.
//!
//! Every frame on the wire is a single JSON object with a `type` tag. The
//! enums here are decoded once at the edge and dispatched by exhaustive
//! match, so an unrecognized tag is a decode error rather than a silent
//! fallthrough.
//!
//! Relay kinds (`offer`, `answer`, `iceCandidate`, `message`, `endChat`)
//! decode `to` and `payload` as `Option` even though the contract requires
//! them: the router owns validation and replies with a precise `error`
//! message naming the missing field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::ConnectionId;

/// A message received from a client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Request to be paired with another waiting connection.
    Waiting,
    /// Session-setup offer, relayed verbatim to `to`.
    Offer {
        /// Destination connection.
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<ConnectionId>,
        /// Opaque signaling blob.
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    /// Session-setup answer, relayed verbatim to `to`.
    Answer {
        /// Destination connection.
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<ConnectionId>,
        /// Opaque signaling blob.
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    /// ICE candidate, relayed verbatim to `to`.
    IceCandidate {
        /// Destination connection.
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<ConnectionId>,
        /// Opaque signaling blob.
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    /// Chat text, relayed to `to`. The payload must carry a non-empty
    /// `text` field; everything else in it is opaque.
    Message {
        /// Destination connection.
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<ConnectionId>,
        /// Chat payload (`{text, ...}`).
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    /// End the current chat / cancel the sender's wait.
    EndChat {
        /// Destination connection.
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<ConnectionId>,
    },
    /// Keepalive response to a server `ping`.
    Pong,
}

impl ClientMessage {
    /// Wire tag for this message kind (matches the JSON `type` field).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "iceCandidate",
            Self::Message { .. } => "message",
            Self::EndChat { .. } => "endChat",
            Self::Pong => "pong",
        }
    }
}

/// A message sent to a client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// First message on every connection: the client's own identifier.
    Welcome {
        /// The newly minted connection identifier.
        id: ConnectionId,
    },
    /// Sent to both sides when a pairing is established.
    Paired {
        /// The other member of the pair.
        partner_id: ConnectionId,
    },
    /// Forwarded session-setup offer.
    Offer {
        /// Originating connection.
        from: ConnectionId,
        /// Opaque signaling blob, unmodified.
        payload: Value,
    },
    /// Forwarded session-setup answer.
    Answer {
        /// Originating connection.
        from: ConnectionId,
        /// Opaque signaling blob, unmodified.
        payload: Value,
    },
    /// Forwarded ICE candidate.
    IceCandidate {
        /// Originating connection.
        from: ConnectionId,
        /// Opaque signaling blob, unmodified.
        payload: Value,
    },
    /// Forwarded chat message.
    Message {
        /// Originating connection.
        from: ConnectionId,
        /// Chat payload, unmodified.
        payload: Value,
    },
    /// The named connection ended the chat.
    ChatEnded {
        /// Connection that ended the chat.
        from: ConnectionId,
    },
    /// The named partner's connection closed.
    Disconnected {
        /// Connection that went away.
        from: ConnectionId,
    },
    /// Keepalive probe; clients answer with `pong`.
    Ping,
    /// The client's last message violated the wire contract.
    Error {
        /// Human-readable description of the violation.
        message: String,
    },
}

impl ServerMessage {
    /// Build an `error` reply.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── ClientMessage decoding ──────────────────────────────────────

    #[test]
    fn waiting_decodes() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"waiting"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Waiting));
    }

    #[test]
    fn pong_decodes() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"pong"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Pong));
    }

    #[test]
    fn offer_with_destination_and_payload() {
        let raw = r#"{"type":"offer","to":"abc","payload":{"sdp":"v=0"}}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ClientMessage::Offer { to, payload } => {
                assert_eq!(to.unwrap().as_str(), "abc");
                assert_eq!(payload.unwrap()["sdp"], "v=0");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn ice_candidate_tag_is_camel_case() {
        let raw = r#"{"type":"iceCandidate","to":"x","payload":{}}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.kind(), "iceCandidate");
    }

    #[test]
    fn end_chat_tag_is_camel_case() {
        let raw = r#"{"type":"endChat","to":"x"}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.kind(), "endChat");
    }

    #[test]
    fn missing_destination_decodes_as_none() {
        let raw = r#"{"type":"offer","payload":{"sdp":"v=0"}}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ClientMessage::Offer { to, payload } => {
                assert!(to.is_none());
                assert!(payload.is_some());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn missing_payload_decodes_as_none() {
        let raw = r#"{"type":"message","to":"abc"}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ClientMessage::Message { to, payload } => {
                assert!(to.is_some());
                assert!(payload.is_none());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_a_decode_error() {
        let raw = r#"{"type":"selfDestruct"}"#;
        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }

    #[test]
    fn missing_type_is_a_decode_error() {
        let raw = r#"{"to":"abc","payload":{}}"#;
        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }

    #[test]
    fn non_object_is_a_decode_error() {
        assert!(serde_json::from_str::<ClientMessage>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<ClientMessage>("\"waiting\"").is_err());
    }

    #[test]
    fn stray_fields_are_ignored() {
        let raw = r#"{"type":"waiting","from":"spoofed"}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        assert!(matches!(msg, ClientMessage::Waiting));
    }

    #[test]
    fn kind_matches_wire_tag_for_all_variants() {
        let cases: Vec<(ClientMessage, &str)> = vec![
            (ClientMessage::Waiting, "waiting"),
            (
                ClientMessage::Offer {
                    to: None,
                    payload: None,
                },
                "offer",
            ),
            (
                ClientMessage::Answer {
                    to: None,
                    payload: None,
                },
                "answer",
            ),
            (
                ClientMessage::IceCandidate {
                    to: None,
                    payload: None,
                },
                "iceCandidate",
            ),
            (
                ClientMessage::Message {
                    to: None,
                    payload: None,
                },
                "message",
            ),
            (ClientMessage::EndChat { to: None }, "endChat"),
            (ClientMessage::Pong, "pong"),
        ];
        for (msg, tag) in cases {
            assert_eq!(msg.kind(), tag);
            let json = serde_json::to_value(&msg).unwrap();
            assert_eq!(json["type"], tag);
        }
    }

    // ── ServerMessage encoding ──────────────────────────────────────

    #[test]
    fn welcome_carries_id() {
        let msg = ServerMessage::Welcome {
            id: ConnectionId::from("c1"),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "welcome");
        assert_eq!(json["id"], "c1");
    }

    #[test]
    fn paired_field_is_partner_id_camel_case() {
        let msg = ServerMessage::Paired {
            partner_id: ConnectionId::from("c2"),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "paired");
        assert_eq!(json["partnerId"], "c2");
        assert!(json.get("partner_id").is_none());
    }

    #[test]
    fn forwarded_offer_keeps_payload_verbatim() {
        let payload = json!({"sdp": "v=0", "extra": [1, 2, 3]});
        let msg = ServerMessage::Offer {
            from: ConnectionId::from("c1"),
            payload: payload.clone(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "offer");
        assert_eq!(json["from"], "c1");
        assert_eq!(json["payload"], payload);
    }

    #[test]
    fn chat_ended_and_disconnected_carry_from() {
        let ended = serde_json::to_value(ServerMessage::ChatEnded {
            from: ConnectionId::from("a"),
        })
        .unwrap();
        assert_eq!(ended["type"], "chatEnded");
        assert_eq!(ended["from"], "a");

        let gone = serde_json::to_value(ServerMessage::Disconnected {
            from: ConnectionId::from("b"),
        })
        .unwrap();
        assert_eq!(gone["type"], "disconnected");
        assert_eq!(gone["from"], "b");
    }

    #[test]
    fn ping_is_bare() {
        let json = serde_json::to_value(ServerMessage::Ping).unwrap();
        assert_eq!(json, json!({"type": "ping"}));
    }

    #[test]
    fn error_constructor() {
        let msg = ServerMessage::error("missing 'to' field");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "missing 'to' field");
    }

    #[test]
    fn server_message_roundtrip() {
        let msg = ServerMessage::Message {
            from: ConnectionId::from("c9"),
            payload: json!({"text": "hi there"}),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ServerMessage = serde_json::from_str(&json).unwrap();
        match back {
            ServerMessage::Message { from, payload } => {
                assert_eq!(from.as_str(), "c9");
                assert_eq!(payload["text"], "hi there");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
