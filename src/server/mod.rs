//! HTTP surface: per-platform download endpoints, the legacy Instagram
//! endpoint and a health check, behind a permissive CORS layer.

mod handlers;
mod response;

use crate::{config::Config, media::MediaDownloader};
use anyhow::{Context, Result};
use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_DISPOSITION,
            CONTENT_TYPE,
        },
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::{net::TcpListener, sync::watch};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    downloader: Arc<MediaDownloader>,
}

pub fn create_router(downloader: Arc<MediaDownloader>) -> Router {
    let state = AppState { downloader };

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/download", post(handlers::legacy_download))
        .route("/api/download/{platform}", post(handlers::download))
        // Path used by the bundled web frontend
        .route("/api/{platform}", post(handlers::download))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(cors_layer())
        // CorsLayer only sends these on preflight
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, GET, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Any origin may call the API. OPTIONS requests are answered here with an
/// empty 200 and never reach a handler.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([CONTENT_DISPOSITION])
}

pub async fn run(config: &Config, downloader: Arc<MediaDownloader>) -> Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Server starting on http://{}", listener.local_addr()?);

    serve(
        listener,
        create_router(downloader),
        shutdown_signal(),
        config.server.shutdown_grace(),
    )
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Serves until `signal` resolves, then gives in-flight requests `grace` to
/// finish. Whatever is still running after that is dropped, which kills its
/// yt-dlp child and removes its workspace.
async fn serve(
    listener: TcpListener,
    router: Router,
    signal: impl Future<Output = ()> + Send + 'static,
    grace: Duration,
) -> Result<()> {
    let (stopping_tx, mut stopping_rx) = watch::channel(false);
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        signal.await;
        let _ = stopping_tx.send(true);
    });

    let deadline = async move {
        let signalled = stopping_rx.wait_for(|stopping| *stopping).await.is_ok();
        if !signalled {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server.into_future() => result.context("Server error"),
        _ = deadline => {
            warn!("Requests still running after {:?}, dropping them", grace);
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
