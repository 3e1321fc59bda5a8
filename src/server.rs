//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared, read-only state holding the
//! proxy config and the backend HTTP client), [`build_router`] for the
//! TLS listener, [`build_redirect_router`] for the optional plaintext
//! listener, [`serve_tls`] which binds the HTTPS front end, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::config::ProxyConfig;
use crate::logging;
use crate::proxy;

pub type HttpClient = Client<HttpConnector, Body>;

pub struct AppState {
    pub proxy: ProxyConfig,
    pub http_client: HttpClient,
}

impl AppState {
    #[must_use]
    pub fn new(proxy: ProxyConfig) -> Self {
        Self {
            proxy,
            http_client: build_http_client(),
        }
    }
}

/// Plain HTTP/1.1 client for the backend leg, shared by all requests.
#[must_use]
pub fn build_http_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(proxy::forward_handler)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(logging::exchange_span)
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                )
                .on_failure(DefaultOnFailure::new().level(Level::WARN)),
        )
        .with_state(state)
}

/// Router for the plaintext listener: every request is redirected to HTTPS.
pub fn build_redirect_router(https_port: u16) -> Router {
    Router::new()
        .fallback(proxy::redirect::redirect_handler)
        .with_state(https_port)
}

/// Serve `router` over TLS until `handle` is told to shut down.
pub async fn serve_tls(
    addr: SocketAddr,
    tls: RustlsConfig,
    router: Router,
    handle: Handle,
) -> std::io::Result<()> {
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(router.into_make_service_with_connect_info::<SocketAddr>())
        .await
}

/// Resolves with the name of the first shutdown signal received. A signal
/// whose handler cannot be installed is simply never reported.
pub async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot watch for Ctrl+C, proxy only stops on SIGTERM");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot watch for SIGTERM, proxy only stops on Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
