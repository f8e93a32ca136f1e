//! HTTP server lifecycle: bind, serve, and shut down gracefully.

use crate::config::Config;
use crate::router::build_router;
use crate::state::AppState;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address is invalid, cannot be bound, or the
/// server fails while running.
pub async fn run(config: &Config, state: AppState) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "Server listening");

    serve(listener, config, state, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns an error if the server fails while running.
pub async fn serve(
    listener: TcpListener,
    config: &Config,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(state, &config.api);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `127.0.0.1:0` and serve in a background task.
///
/// Returns the bound address. Used by integration tests and local tooling
/// that need a real socket.
///
/// # Errors
///
/// Returns an error if the loopback listener cannot be bound.
pub async fn spawn_local(config: Config, state: AppState) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(error) = serve(listener, &config, state, std::future::pending()).await {
            warn!(%error, "Local server exited");
        }
    });

    Ok(addr)
}

/// Graceful shutdown signal handler.
///
/// Waits for Ctrl+C (SIGINT) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ezratask_testing::test_clock;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let state = AppState::with_clock(Arc::new(test_clock()));
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            serve(listener, &Config::default(), state, async {
                let _ = rx.await;
            })
            .await
        });

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_spawn_local_serves_health() {
        let state = AppState::with_clock(Arc::new(test_clock()));
        let addr = spawn_local(Config::default(), state).await.unwrap();

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#"{"status":"OK"}"#));
    }
}
