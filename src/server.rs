/// Server setup and initialization
///
/// Wires together all components: logging, trigger registry, process runner and
/// HTTP routes. Provides the application factory used by `main` and the
/// integration tests.

use crate::{
    api::{create_trigger_routes, triggers::error_chain, TriggerAppState},
    config::Config,
    runtime::ProcessRunner,
    trigger::TriggerRegistry,
};
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Create the Axum application for an already loaded registry
pub fn create_app(registry: Arc<TriggerRegistry>, runner: ProcessRunner) -> Router {
    let state = TriggerAppState {
        registry,
        runner: Arc::new(runner),
    };

    create_trigger_routes().with_state(state)
}

/// Load triggers and build the application from configuration
///
/// Fails if the trigger file is unreadable or malformed; nothing is bound in
/// that case.
pub fn build_app(config: &Config) -> Result<Router> {
    let registry = match TriggerRegistry::load(&config.triggers.path) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "❌ Failed to load triggers, not starting server");
            return Err(e.into());
        }
    };

    let runner = ProcessRunner::new(config.runner.command_timeout());
    match runner.timeout() {
        Some(limit) => tracing::info!("⏱️ Commands are killed after {:?}", limit),
        None => tracing::debug!("⏱️ No command timeout configured"),
    }

    Ok(create_app(Arc::new(registry), runner))
}

/// Initialize the tracing subscriber with the configured verbosity
pub fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_max_level(config.logging.level.as_tracing_level())
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();
}

/// Start the HTTP server with the given configuration
///
/// Loads the triggers, binds the configured address and serves until Ctrl-C.
pub async fn start_server(config: Config) -> Result<()> {
    init_tracing(&config);

    tracing::info!(
        ">> remote-trigger {} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let app = build_app(&config)?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        time = %chrono::Utc::now().to_rfc3339(),
        "Starting server..."
    );
    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
