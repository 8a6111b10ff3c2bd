//! taipeisim: traffic-aware route planning over Taipei's street network.
//!
//! Loads the street network and historical detector data once, then serves
//! `POST /calculate_route` until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ts_server::{router, startup, Cli, ServerConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_LOG_FILTER: &str = "ts_server=info,ts_route=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "taipeisim starting");

    let cli = Cli::parse();
    let config = ServerConfig::resolve(&cli).context("loading configuration")?;
    config.validate().context("validating configuration")?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        search_timeout_ms = ?config.routing.search_timeout_ms,
        request_timeout_ms = config.listener.request_timeout_ms,
        "configuration loaded"
    );

    // CSV and PBF parsing are blocking.
    let state = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || startup::build_state(&config))
            .await
            .context("startup task failed")?
    };

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .with_context(|| format!("binding {}", config.listener.bind_address))?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
