//! Buildwatch server binary.
//!
//! Starts the gRPC listener serving the ingestion and query surfaces,
//! with structured logging and graceful shutdown on SIGTERM/SIGINT.

use std::net::SocketAddr;
use std::sync::Arc;

use buildwatch_server::config;
use buildwatch_server::recorder::Recorder;
use buildwatch_store::ReportStore;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("BUILDWATCH_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the server cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let recorder = if config.recording.enabled {
        std::fs::create_dir_all(&config.recording.dir)
            .expect("failed to create recording directory — check recording.dir in config");
        let recorder = Arc::new(Recorder::new(
            config.recording.dir.clone(),
            config.recording.label_prefix.clone(),
        ));
        tracing::info!(dir = %recorder.dir().display(), "recording ingestion streams");
        Some(recorder)
    } else {
        None
    };

    let store = Arc::new(ReportStore::new());
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting buildwatch server");

    buildwatch_server::server(store, recorder)
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("buildwatch server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        _ = terminate => {},
    }
}
