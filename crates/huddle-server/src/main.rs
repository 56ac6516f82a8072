//! huddle server binary — wires the relay core to the WebSocket front end
//! and runs until interrupted.

use anyhow::{Context, Result};
use huddle_relay::run_sweeper;
use huddle_server::config::ServerConfig;
use huddle_server::metrics;
use huddle_server::server::HuddleServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let metrics_handle = metrics::install_recorder();
    let server = HuddleServer::new(config.clone(), metrics_handle);

    let sweeper = tokio::spawn(run_sweeper(
        server.relay().clone(),
        config.sweep_interval(),
        server.shutdown().token(),
    ));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    let shutdown = server.shutdown().clone();
    let signal_token = shutdown.token();
    axum::serve(listener, server.router())
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, shutting down");
                }
                () = signal_token.cancelled() => {}
            }
        })
        .await
        .context("server error")?;

    shutdown.graceful_shutdown(vec![sweeper], None).await;
    info!("shutdown complete");
    Ok(())
}
