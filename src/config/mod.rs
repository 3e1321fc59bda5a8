//! Startup configuration.
//!
//! [`ProxyConfig`] is the immutable value every request handler reads:
//! the single backend authority requests are forwarded to. [`ServeConfig`]
//! bundles it with the listener addresses and certificate paths, and is
//! produced only by [`validation::validate`], so holding one means every
//! startup check has passed.

pub mod validation;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::Uri;

use crate::error::TlstermError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    backend: Authority,
}

impl ProxyConfig {
    /// Parse a `host:port` backend address.
    pub fn new(backend: &str) -> Result<Self, TlstermError> {
        parse_backend(backend)
            .map(|backend| Self { backend })
            .map_err(|reason| TlstermError::InvalidBackend {
                address: backend.to_string(),
                reason,
            })
    }

    #[must_use]
    pub const fn backend(&self) -> &Authority {
        &self.backend
    }

    /// `http://<backend><path_and_query>`; a request without a path goes to `/`.
    pub fn backend_uri(
        &self,
        path_and_query: Option<&PathAndQuery>,
    ) -> Result<Uri, axum::http::Error> {
        let path_and_query = path_and_query.map_or("/", PathAndQuery::as_str);
        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.backend.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

pub(crate) fn parse_backend(address: &str) -> Result<Authority, String> {
    let address = address.trim();
    if address.is_empty() {
        return Err("address cannot be empty".into());
    }
    if address.contains('@') {
        return Err("credentials are not allowed in the backend address".into());
    }
    if address.contains("://") {
        return Err("expected host:port without a scheme".into());
    }
    let authority: Authority = address
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| e.to_string())?;
    if authority.host().is_empty() {
        return Err("host cannot be empty".into());
    }
    if let Some((_, port)) = authority.as_str().rsplit_once(':') {
        if !authority.as_str().ends_with(']') && port.parse::<u16>().is_err() {
            return Err("port must be a number between 0 and 65535".into());
        }
    }
    Ok(authority)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub listen: SocketAddr,
    pub redirect: Option<SocketAddr>,
    pub proxy: ProxyConfig,
    pub tls: TlsPaths,
}
