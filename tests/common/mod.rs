//! Shared fixtures: a stub backend and proxy launchers.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::sync::oneshot;

use tlsterm::config::ProxyConfig;
use tlsterm::server::{self, AppState};

/// Backend with two endpoints:
/// - `GET /hello`: 200, `X-App: ok`, a few hop-by-hop headers, body `hello`.
/// - anything else: echoes what the backend saw as `x-seen-*` headers and
///   returns the request body unchanged.
pub async fn spawn_backend() -> SocketAddr {
    let router = Router::new()
        .route("/hello", get(hello))
        .fallback(echo)
        .layer(DefaultBodyLimit::disable());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn hello() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            ("x-app", "ok"),
            ("keep-alive", "timeout=5"),
            ("proxy-authenticate", "Basic realm=\"backend\""),
            ("trailers", "x-checksum"),
        ],
        "hello",
    )
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let seen = |name: &str| {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if values.is_empty() {
            HeaderValue::from_static("absent")
        } else {
            HeaderValue::from_str(&values.join(" | ")).unwrap()
        }
    };

    let mut response = HeaderMap::new();
    response.insert("x-seen-method", HeaderValue::from_str(method.as_str()).unwrap());
    response.insert("x-seen-uri", HeaderValue::from_str(&uri.to_string()).unwrap());
    response.insert("x-seen-host", seen("host"));
    response.insert("x-seen-xff", seen("x-forwarded-for"));
    response.insert("x-seen-te", seen("te"));
    response.insert("x-seen-keep-alive", seen("keep-alive"));
    response.insert("x-seen-proxy-authorization", seen("proxy-authorization"));
    response.insert("x-seen-authorization", seen("authorization"));
    response.append("set-cookie", HeaderValue::from_static("a=1"));
    response.append("set-cookie", HeaderValue::from_static("b=2"));
    (StatusCode::CREATED, response, body)
}

/// Fires its channel when dropped, i.e. when the stream that owns it is
/// dropped by the server.
struct NotifyOnDrop(Option<oneshot::Sender<()>>);

impl Drop for NotifyOnDrop {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

/// Backend whose `GET /ticks` body emits `tick\n` every 20ms and never
/// ends on its own. The returned receiver resolves once that body stream
/// is dropped. `GET /hello` behaves as in [`spawn_backend`].
pub async fn spawn_ticking_backend() -> (SocketAddr, oneshot::Receiver<()>) {
    let (tx, rx) = oneshot::channel();
    let notify = Arc::new(Mutex::new(Some(NotifyOnDrop(Some(tx)))));

    let ticks = move || {
        let guard = notify.lock().unwrap().take();
        async move {
            let stream = futures_util::stream::unfold(guard, |guard| async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Some((Ok::<_, std::io::Error>(Bytes::from_static(b"tick\n")), guard))
            });
            Body::from_stream(stream)
        }
    };

    let router = Router::new()
        .route("/hello", get(hello))
        .route("/ticks", get(ticks));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, rx)
}

/// An address nothing is listening on.
pub async fn unreachable_backend() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// The proxy router served over plain TCP, for exercising the handler
/// without a TLS handshake.
pub async fn spawn_proxy(backend: SocketAddr) -> SocketAddr {
    let state = Arc::new(AppState::new(
        ProxyConfig::new(&backend.to_string()).unwrap(),
    ));
    let router = server::build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
