//! Header filtering for both legs of a proxied exchange.
//!
//! Pure functions over [`HeaderMap`]: [`strip_hop_by_hop`] removes the
//! connection-scoped headers an intermediary must not forward,
//! [`copy_headers`] merges one map into another without overwriting, and
//! [`append_forwarding_chain`] records the client address in
//! `X-Forwarded-For`.

use std::sync::LazyLock;

use axum::http::header::{
    CONNECTION, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRANSFER_ENCODING, UPGRADE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// RFC 2616 §13.5.1 hop-by-hop headers.
static HOP_BY_HOP: LazyLock<[HeaderName; 8]> = LazyLock::new(|| {
    [
        CONNECTION,
        HeaderName::from_static("keep-alive"),
        PROXY_AUTHENTICATE,
        PROXY_AUTHORIZATION,
        TE,
        HeaderName::from_static("trailers"),
        TRANSFER_ENCODING,
        UPGRADE,
    ]
});

#[must_use]
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
}

/// Remove every hop-by-hop header, leaving all other entries in their
/// original relative order.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    if !HOP_BY_HOP.iter().any(|name| headers.contains_key(name)) {
        return;
    }

    // HeaderMap::remove swaps entries around, so rebuild instead.
    let mut retained = HeaderMap::with_capacity(headers.len());
    let mut current: Option<HeaderName> = None;
    for (name, value) in std::mem::take(headers) {
        // Only the first value of each name carries it.
        if let Some(name) = name {
            current = Some(name);
        }
        if let Some(name) = current.as_ref().filter(|name| !is_hop_by_hop(name)) {
            retained.append(name.clone(), value);
        }
    }
    *headers = retained;
}

/// Append every value in `src` to `dst`. Existing values in `dst` are kept.
pub fn copy_headers(dst: &mut HeaderMap, src: &HeaderMap) {
    for (name, value) in src {
        dst.append(name.clone(), value.clone());
    }
}

/// Fold any prior `X-Forwarded-For` values into one entry and append
/// `client_ip` as the newest hop. Prior values are joined byte for byte.
pub fn append_forwarding_chain(headers: &mut HeaderMap, client_ip: &str) {
    let mut chain: Vec<u8> = Vec::new();
    for value in headers.get_all(&X_FORWARDED_FOR).iter() {
        chain.extend_from_slice(value.as_bytes());
        chain.extend_from_slice(b", ");
    }
    chain.extend_from_slice(client_ip.as_bytes());

    match HeaderValue::from_bytes(&chain) {
        Ok(value) => {
            headers.insert(X_FORWARDED_FOR, value);
        }
        Err(e) => {
            tracing::warn!(
                client_ip,
                error = %e,
                "unrepresentable x-forwarded-for chain, leaving header as received"
            );
        }
    }
}
