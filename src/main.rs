//! Ultravox stages demo server
//!
//! Starts voice calls with Ultravox and serves the tools the voice model uses
//! to move a call between conversation stages (greeting, scheduling,
//! rescheduling).

mod api;
mod bootstrap;
mod config;
mod provider;
mod scheduling;
mod stages;
mod tools;

use api::{create_router, AppState};
use bootstrap::CallBootstrap;
use config::AppConfig;
use provider::{CallProvider, LoggingProvider, RetryPolicy, RetryingProvider, UltravoxClient};
use scheduling::LoggingSink;
use stages::{StageRegistry, SystemClock};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ultravox_stages=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration. Set ULTRAVOX_API_KEY and TOOL_BASE_URL.");
            return Err(e.into());
        }
    };

    tracing::info!(
        api_url = %config.api_url,
        tool_base_url = %config.tool_base_url,
        voice = %config.voice,
        timeout_secs = config.provider_timeout.as_secs(),
        max_retries = config.max_retries,
        "Configuration loaded"
    );

    // Stage registry; tool callbacks point back at this server
    let registry = Arc::new(StageRegistry::new(&config.tool_base_url, Arc::new(SystemClock))?);

    // Provider client: logging outermost so each attempt sequence is one log line
    let client: Arc<dyn CallProvider> = Arc::new(UltravoxClient::new(
        &config.api_url,
        config.api_key.clone(),
        config.provider_timeout,
    )?);
    let retrying: Arc<dyn CallProvider> = Arc::new(RetryingProvider::new(
        client,
        RetryPolicy::with_max_retries(config.max_retries),
    ));
    let provider: Arc<dyn CallProvider> = Arc::new(LoggingProvider::new(retrying));

    // Create application state
    let bootstrap = CallBootstrap::new(registry.clone(), provider, config.voice.clone());
    let state = AppState::new(registry, bootstrap, Arc::new(LoggingSink));

    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Ultravox stages server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down");
}
