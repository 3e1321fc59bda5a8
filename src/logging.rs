//! Structured logging setup using the `tracing` ecosystem.
//!
//! Configures a `tracing-subscriber` with either JSON output (for
//! production) or pretty-printed output (for TTY / local dev). Format
//! is auto-detected from the terminal but can be forced via `--json`
//! or `--pretty`.
//!
//! [`exchange_span`] is plugged into the `TraceLayer` so every event a
//! proxied request emits carries the same `request_id`.

use std::io::IsTerminal;

use axum::extract::Request;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// `--json` wins over `--pretty`. Without either, pretty output is used
    /// only when stdout is a terminal, so a proxy under a supervisor logs JSON.
    #[must_use]
    pub fn from_flags(pretty: bool, json: bool) -> Self {
        match (json, pretty) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) if std::io::stdout().is_terminal() => Self::Pretty,
            (false, false) => Self::Json,
        }
    }
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let filter = tracing_subscriber::filter::Targets::new()
        .with_default(tracing::Level::from(level))
        // hyper's connection-level chatter drowns out the exchange log at debug
        .with_target("hyper_util", tracing::Level::INFO)
        .with_target("rustls", tracing::Level::INFO);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_target(false))
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }
}

/// Span covering one client exchange, from request head to the end of the
/// response head. The id is only for log correlation and is never forwarded.
pub fn exchange_span(request: &Request) -> tracing::Span {
    let request_id = uuid::Uuid::new_v4();
    tracing::info_span!(
        "exchange",
        %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_wins() {
        assert_eq!(LogFormat::from_flags(false, true), LogFormat::Json);
        assert_eq!(LogFormat::from_flags(true, true), LogFormat::Json);
    }

    #[test]
    fn pretty_flag_forces_pretty() {
        assert_eq!(LogFormat::from_flags(true, false), LogFormat::Pretty);
    }

    #[test]
    fn exchange_span_builds_without_subscriber() {
        let request = axum::http::Request::builder()
            .uri("/orders?page=2")
            .body(axum::body::Body::empty())
            .unwrap();
        // No subscriber is installed, so the span is disabled but must not panic.
        let _span = exchange_span(&request);
    }
}
