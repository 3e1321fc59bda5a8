//! tlsterm is a TLS-terminating HTTP reverse proxy.
//!
//! It accepts HTTPS connections, decrypts them, and forwards every request
//! unencrypted to one fixed backend, relaying the backend's response back
//! to the client. A backend that only speaks plain HTTP can be exposed over
//! HTTPS without carrying any TLS logic itself.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate).
//! - [`config`] -- The immutable [`ProxyConfig`](config::ProxyConfig) and
//!   startup validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Core forwarding: hop-by-hop filtering, `X-Forwarded-For`
//!   chaining, streaming relay, and HTTPS upgrade redirects.
//! - [`server`] -- Axum routers, shared state, the backend HTTP client, the
//!   TLS listener, and graceful shutdown.
//! - [`tls`] -- Certificate and key loading for the HTTPS listener.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod server;
pub mod tls;
