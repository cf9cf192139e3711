use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use car_advisor::config::Config;
use car_advisor::keepalive::KeepAlive;
use car_advisor::server::{build_router, build_state, ollama_transport};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; level via RUST_LOG (default info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    let bind: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind '{}' (expected host:port)", config.server.bind))?;

    let transport = ollama_transport(&config)?;

    let keepalive = config.keepalive_interval().map(|interval| {
        tracing::info!(
            model = %config.ollama.model,
            interval_secs = interval.as_secs(),
            "Starting model keep-alive"
        );
        KeepAlive::new(transport.clone(), config.ollama.model.clone(), interval).spawn()
    });

    let router = build_router(build_state(&config, transport));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!(
        %bind,
        scorer = %config.scorer.program,
        line_selection = ?config.scorer.line_selection,
        ollama = %config.ollama.base_url,
        "Starting car-advisor HTTP server"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = keepalive {
        handle.abort();
    }
    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
