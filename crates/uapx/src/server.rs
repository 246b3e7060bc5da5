// ── Metrics endpoint ──
//
// `GET /metrics` runs a full collection pass and renders it. Nothing is
// cached between requests. Concurrent requests are not serialized; each
// one polls the whole fleet on its own.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use uapx_core::metrics::CONTENT_TYPE;
use uapx_core::{Catalogue, Collector, Fetch, Scrape};

use crate::error::CliError;

/// Shared, read-only state of every request.
pub struct AppState<F> {
    pub collector: Collector<F>,
    pub catalogue: Arc<Catalogue>,
}

pub fn router<F: Fetch + 'static>(state: AppState<F>) -> Router {
    Router::new()
        .route("/metrics", get(metrics::<F>))
        .with_state(Arc::new(state))
}

async fn metrics<F: Fetch + 'static>(State(state): State<Arc<AppState<F>>>) -> Response {
    let started = Instant::now();
    let records = state.collector.collect().await;

    match Scrape::new(Arc::clone(&state.catalogue), records).render() {
        Ok(body) => {
            debug!(
                bytes = body.len(),
                elapsed = ?started.elapsed(),
                "scrape served"
            );
            ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
        }
        Err(e) => {
            error!(error = %e, "cannot render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Bind `0.0.0.0:port` and serve until SIGINT or SIGTERM.
pub async fn serve<F: Fetch + 'static>(port: u16, state: AppState<F>) -> Result<(), CliError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| CliError::Bind { port, source })?;

    info!(%addr, devices = state.collector.devices().len(), "listening for requests");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(CliError::Serve)?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
