//! Liveness sweeper: periodic pruning of stale waiting-queue entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::relay::Relay;

/// Run the sweep cycle until cancelled.
///
/// Each tick removes queue entries whose connection has gone away without a
/// close event (a crashed client, a half-dead socket) and reports the
/// count. Paired connections and the registry are never touched.
pub async fn run_sweeper(relay: Arc<Relay>, period: Duration, cancel: CancellationToken) {
    let mut tick = time::interval(period);
    // Skip the immediate first tick
    let _ = tick.tick().await;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let removed = relay.sweep_stale();
                if removed > 0 {
                    info!(removed, "pruned stale queue entries");
                }
            }
            () = cancel.cancelled() => {
                debug!("sweeper cancelled");
                return;
            }
        }
    }
}
