//! # huddle-wire
//!
//! JSON wire protocol for the huddle rendezvous relay.
//!
//! - [`ConnectionId`]: opaque identifier naming one live connection
//! - [`ClientMessage`]: every message a client may send, as a tagged enum
//! - [`ServerMessage`]: every message the server may send back
//!
//! Field and tag names in this crate are the wire contract; changing them
//! breaks deployed clients.

#![deny(unsafe_code)]

pub mod ids;
pub mod message;

pub use ids::ConnectionId;
pub use message::{ClientMessage, ServerMessage};
