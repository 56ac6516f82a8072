//! # huddle-relay
//!
//! The transport-agnostic core of the huddle rendezvous relay: connection
//! registry, waiting queue, pairing engine, message router, and the
//! liveness sweeper.
//!
//! The core sees the transport only as a per-connection send channel plus a
//! readiness predicate ([`ClientHandle`]). All shared state lives in one
//! [`Relay`] context object; every open/close/message event locks it once
//! and runs to completion, so pairing and teardown are never observable
//! half-applied.

#![deny(unsafe_code)]

pub mod handle;
mod pairing;
pub mod queue;
pub mod registry;
pub mod relay;
mod router;
pub mod sweeper;

pub use handle::ClientHandle;
pub use queue::WaitingQueue;
pub use registry::{AlreadyRegistered, ConnectionRegistry};
pub use relay::Relay;
pub use sweeper::run_sweeper;
