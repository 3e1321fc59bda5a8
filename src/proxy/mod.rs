//! Core HTTP request forwarding handler.
//!
//! [`forward_handler`] is the Axum fallback that receives every request
//! on the TLS listener. It either redirects plain-`http` request targets
//! ([`redirect`]) or forwards the request to the configured backend and
//! streams the backend's response back. Header sanitization for both legs
//! lives in [`headers`].

pub mod headers;
pub mod redirect;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, request, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use hyper::body::Incoming;

use crate::config::ProxyConfig;
use crate::server::AppState;

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();

    if let Some(location) = redirect::https_upgrade(&parts.uri) {
        tracing::info!(location = %location, "plain http request target, redirecting");
        return redirect::moved_permanently(&location);
    }

    let outbound = match build_outbound(&state.proxy, parts, body, client.ip()) {
        Ok(outbound) => outbound,
        Err(e) => {
            tracing::error!(error = %e, "failed to build backend request");
            return bad_gateway();
        }
    };

    let start = Instant::now();
    match state.http_client.request(outbound).await {
        Ok(response) => {
            tracing::debug!(
                status = response.status().as_u16(),
                latency_ms = elapsed_ms(start),
                "backend responded"
            );
            relay(response)
        }
        Err(e) => {
            tracing::error!(
                backend = %state.proxy.backend(),
                error = %e,
                latency_ms = elapsed_ms(start),
                "backend request failed"
            );
            bad_gateway()
        }
    }
}

/// Turn an inbound request into one addressed to the backend.
///
/// The inbound headers are moved, filtered, and given to the outbound
/// request; the body is passed through as a stream.
pub fn build_outbound(
    config: &ProxyConfig,
    parts: request::Parts,
    body: Body,
    client_ip: IpAddr,
) -> Result<Request<Body>, axum::http::Error> {
    let uri = config.backend_uri(parts.uri.path_and_query())?;

    let mut forwarded = parts.headers;
    headers::strip_hop_by_hop(&mut forwarded);
    headers::append_forwarding_chain(&mut forwarded, &client_ip.to_canonical().to_string());
    forwarded.insert(
        header::HOST,
        HeaderValue::from_str(config.backend().as_str())?,
    );

    let mut outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .body(body)?;
    *outbound.headers_mut() = forwarded;
    Ok(outbound)
}

/// Client-facing response carrying the backend's status, filtered headers,
/// and streamed body. Dropping the response releases the backend connection.
pub fn relay(response: hyper::Response<Incoming>) -> Response {
    let (mut parts, body) = response.into_parts();
    headers::strip_hop_by_hop(&mut parts.headers);

    let mut relayed = Response::new(Body::new(body));
    *relayed.status_mut() = parts.status;
    headers::copy_headers(relayed.headers_mut(), &parts.headers);
    relayed
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Server Error").into_response()
}
