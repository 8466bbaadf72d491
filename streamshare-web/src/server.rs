//! HTTP server assembly and lifecycle
//!
//! Builds the route table over a shared [`AppState`] and serves it on an
//! already-bound listener until Ctrl-C or SIGTERM. Each connection is handled
//! on its own task, so a slow or failed transfer never holds up another.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{ConnectInfo, DefaultBodyLimit, Request};
use axum::routing::{get, post};
use streamshare_core::config::TransferConfig;
use streamshare_core::{ContentRegistry, ServerConfig};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, info_span};

use crate::handlers::{
    download_file, download_named_upload, landing_page, not_found, upload_file,
};
use crate::streaming::{StreamingEngine, TransferObserver, UploadReceiver};

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Files currently offered for download
    pub registry: Arc<ContentRegistry>,
    /// Addresses shown on the landing page
    pub server_config: Arc<ServerConfig>,
    /// Response body producer for downloads
    pub engine: StreamingEngine,
    /// Persists request bodies of `POST /upload`
    pub uploads: UploadReceiver,
}

impl AppState {
    /// Assembles the state for a server bound at `server_config`.
    ///
    /// Uploads are stored in `upload_dir`; full downloads report progress to
    /// `observer`.
    pub fn new(
        registry: Arc<ContentRegistry>,
        server_config: ServerConfig,
        transfer: &TransferConfig,
        upload_dir: PathBuf,
        observer: Arc<dyn TransferObserver>,
    ) -> Self {
        Self {
            registry,
            server_config: Arc::new(server_config),
            engine: StreamingEngine::new(transfer.chunk_size, observer),
            uploads: UploadReceiver::new(
                upload_dir,
                transfer.temp_file_suffix,
                transfer.upload_idle_timeout,
            ),
        }
    }
}

/// Builds the route table.
///
/// Unknown paths and unsupported methods on known paths both answer `404`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page).fallback(not_found))
        .route(
            "/upload",
            post(upload_file)
                .get(download_named_upload)
                .fallback(not_found)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/{name}", get(download_file).fallback(not_found))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let client_ip = request
                        .extensions()
                        .get::<ConnectInfo<SocketAddr>>()
                        .map_or_else(|| "unknown".to_string(), |ConnectInfo(addr)| {
                            addr.ip().to_string()
                        });

                    info_span!(
                        "request",
                        client_ip = %client_ip,
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

/// Serves `state` on `listener` until Ctrl-C or SIGTERM.
///
/// In-flight transfers are allowed to finish before this returns.
///
/// # Errors
/// Returns the listener's I/O error if accepting connections fails.
pub async fn run_server(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    run_server_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serves `state` on `listener` until `shutdown` completes.
///
/// # Errors
/// Returns the listener's I/O error if accepting connections fails.
pub async fn run_server_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Listening");
    }

    let app = build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Could not listen for SIGTERM");
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

    info!("Shutdown requested, finishing in-flight transfers");
}
