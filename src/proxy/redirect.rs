//! HTTPS upgrade redirects.
//!
//! Two triggers lead here. On the TLS listener, a request whose target is
//! in absolute form with an `http` scheme (`GET http://host/path`) is
//! answered with a 301 to the same URL over `https` by
//! [`https_upgrade`]. On the optional plaintext listener every request is
//! redirected by [`redirect_handler`], rebuilding the URL from `Host`.

use axum::extract::State;
use axum::http::uri::{Authority, Scheme};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

/// The same URL with its scheme switched to `https`, when the request
/// target explicitly declares `http`. Origin-form targets have no scheme
/// and are never upgraded.
#[must_use]
pub fn https_upgrade(uri: &Uri) -> Option<Uri> {
    if uri.scheme() != Some(&Scheme::HTTP) {
        return None;
    }
    let mut parts = uri.clone().into_parts();
    parts.scheme = Some(Scheme::HTTPS);
    Uri::from_parts(parts).ok()
}

/// Build the `https` URL for a plaintext request that reached `host`.
/// Any port in `host` is replaced by `https_port`, which is omitted when 443.
#[must_use]
pub fn https_location(host: &str, https_port: u16, uri: &Uri) -> Option<Uri> {
    let authority: Authority = host.parse().ok()?;
    let authority = if https_port == 443 {
        authority.host().to_string()
    } else {
        format!("{}:{https_port}", authority.host())
    };
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    Uri::builder()
        .scheme(Scheme::HTTPS)
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
        .ok()
}

pub fn moved_permanently(location: &Uri) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// Fallback for the plaintext listener. State is the HTTPS listener's port.
pub async fn redirect_handler(
    State(https_port): State<u16>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(Authority::as_str));

    match host.and_then(|host| https_location(host, https_port, &uri)) {
        Some(location) => {
            tracing::debug!(location = %location, "redirecting plaintext request");
            moved_permanently(&location)
        }
        None => {
            tracing::warn!(uri = %uri, "plaintext request without a usable Host, cannot redirect");
            (StatusCode::BAD_REQUEST, "Missing or invalid Host header").into_response()
        }
    }
}
