//! Server configuration: compiled defaults with environment overrides.
//!
//! `PORT` is the one externally documented knob (default 8080; absent or
//! invalid values fall back to the default). The `HUDDLE_*` variables tune
//! bind address and timer periods for operators who need them. There are
//! no CLI flags.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the huddle server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"0.0.0.0"`).
    pub host: String,
    /// Port to bind (default `8080`).
    pub port: u16,
    /// Seconds between keepalive `ping` messages per connection.
    pub ping_interval_secs: u64,
    /// Seconds between liveness-sweeper cycles.
    pub sweep_interval_secs: u64,
    /// Outbound message queue depth per connection.
    pub send_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            ping_interval_secs: 30,
            sweep_interval_secs: 60,
            send_queue_capacity: 64,
        }
    }
}

impl ServerConfig {
    /// Defaults with environment variable overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = read_env_u16("PORT") {
            config.port = v;
        }
        if let Some(v) = read_env_string("HUDDLE_HOST") {
            config.host = v;
        }
        if let Some(v) = read_env_u64("HUDDLE_PING_INTERVAL_SECS", 1, 3600) {
            config.ping_interval_secs = v;
        }
        if let Some(v) = read_env_u64("HUDDLE_SWEEP_INTERVAL_SECS", 1, 3600) {
            config.sweep_interval_secs = v;
        }
        config
    }

    /// Keepalive probe period.
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    /// Sweeper cycle period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a port number. Zero is allowed (ephemeral bind).
pub fn parse_u16(val: &str) -> Option<u16> {
    val.parse().ok()
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid port env var, using default");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}
