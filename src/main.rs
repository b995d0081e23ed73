//! LightRAG Bridge Server
//!
//! Exposes the LibreChat LightRAG plugin routes and forwards them to a
//! LightRAG proxy.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lightrag_bridge::config::{Config, ForwardingTarget};
use lightrag_bridge::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "lightrag_bridge=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A bad value is fatal; falling back to defaults would drop LIGHTRAG_PROXY_URL
    let config = Config::from_env().context("Invalid configuration")?;

    tracing::info!("Starting LightRAG Bridge v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Default LightRAG proxy: {}",
        ForwardingTarget::resolve(None, &config.lightrag).base_url()
    );
    tracing::info!(
        "Request timeout: {}s, upload cap: {} bytes",
        config.lightrag.timeout_secs,
        config.lightrag.max_upload_bytes
    );

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid SERVER_HOST: {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    let app_state = AppState::new(config).context("Failed to initialize LightRAG client")?;
    let app = lightrag_bridge::app(app_state);

    // Start server with graceful shutdown
    tracing::info!("LightRAG Bridge listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
