//! # huddle-server
//!
//! Axum HTTP + `WebSocket` front end for the huddle rendezvous relay.
//!
//! - `/ws`: WebSocket upgrade; one relay session per connection
//! - `/health`: liveness probe with connection/queue counts
//! - `/metrics`: Prometheus text exposition
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod metrics;
pub mod server;
pub mod session;
pub mod shutdown;
