//! slidegate - Document upload and conversion gateway
//!
//! Accepts a single-file document upload over HTTP, persists it under
//! `uploads/`, invokes the external conversion command, and serves the
//! converted artifact from `converted/`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slidegate::config::Settings;
use slidegate::{build_router, AppState};

/// Command-line arguments for slidegate
#[derive(Parser, Debug)]
#[command(name = "slidegate")]
#[command(about = "Document upload and conversion gateway")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = "SLIDEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "SLIDEGATE_PORT")]
    port: Option<u16>,

    /// Parent directory for uploads/ and converted/ (overrides config file)
    #[arg(short, long, env = "SLIDEGATE_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slidegate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification, logged before any filesystem work
    info!(
        "Starting slidegate v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    // Config file tier, then CLI/ENV overrides on top
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        settings.data_dir = data_dir;
    }

    info!("Data directory: {}", settings.data_dir.display());
    info!(
        "Converter: {} {}",
        settings.converter.command,
        settings.converter.args.join(" ")
    );

    let host = settings.host.clone();
    let port = settings.port;

    let state = AppState::new(settings).context("Failed to initialize gateway state")?;
    info!("Uploads directory: {}", state.store.uploads_dir().display());
    info!("Converted directory: {}", state.store.converted_dir().display());

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("Listening on http://{}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
