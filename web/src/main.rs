//! EzraTask HTTP server.
//!
//! In-memory todo API. All state is lost on restart.

use ezratask_core::SystemClock;
use ezratask_runtime::TodoStore;
use ezratask_runtime::metrics::MetricsRecorder;
use ezratask_web::{AppState, Config, server};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "ezratask_web={level},ezratask_runtime={level},tower_http=info",
                    level = config.server.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        host = %config.server.host,
        port = config.server.port,
        cors_origins = ?config.api.cors_origins,
        test_endpoints = config.api.enable_test_endpoints,
        "Configuration loaded"
    );

    let metrics = if config.api.metrics_enabled {
        MetricsRecorder::install()?
    } else {
        MetricsRecorder::disabled()
    };

    let store = Arc::new(TodoStore::new(Arc::new(SystemClock)));
    let state = AppState::new(store, metrics);

    server::run(&config, state).await
}
