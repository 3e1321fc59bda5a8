//! Startup validation with detailed error reporting.
//!
//! The [`validate`] function checks the raw [`ProxyArgs`] for every
//! problem that would stop the proxy from serving: unparsable listener
//! addresses, a malformed backend address, and missing certificate or
//! key files. All problems are collected before returning so a single
//! run reports everything that needs fixing.

use std::net::SocketAddr;
use std::path::Path;

use super::{parse_backend, ProxyConfig, ServeConfig, TlsPaths};
use crate::cli::ProxyArgs;
use crate::error::ValidationError;

/// Validate a listener address. Returns the parsed address or a human-readable error.
pub fn validate_listen_addr(addr: &str) -> Result<SocketAddr, String> {
    addr.trim()
        .parse::<SocketAddr>()
        .map_err(|_| format!("'{addr}' is not a valid ip:port socket address"))
}

/// Validate that a PEM file exists and is a regular file.
pub fn validate_pem_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("{} does not exist", path.display()));
    }
    if !path.is_file() {
        return Err(format!("{} is not a regular file", path.display()));
    }
    Ok(())
}

pub fn validate(args: &ProxyArgs) -> Result<ServeConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listen = validate_listen_addr(&args.addr)
        .map_err(|message| {
            errors.push(ValidationError {
                field: "addr".into(),
                message,
                suggestion: args
                    .addr
                    .strip_prefix("localhost:")
                    .map(|port| format!("did you mean '127.0.0.1:{port}'?")),
            });
        })
        .ok();

    let redirect = match args.redirect_addr.as_deref().map(validate_listen_addr) {
        None => None,
        Some(Ok(redirect)) => {
            if listen == Some(redirect) {
                errors.push(ValidationError {
                    field: "redirect-addr".into(),
                    message: "redirect listener cannot share the HTTPS listen address".into(),
                    suggestion: Some("plain HTTP conventionally uses port 80".into()),
                });
            }
            Some(redirect)
        }
        Some(Err(message)) => {
            errors.push(ValidationError {
                field: "redirect-addr".into(),
                message,
                suggestion: None,
            });
            None
        }
    };

    let backend = parse_backend(&args.proxy)
        .map_err(|message| {
            errors.push(ValidationError {
                field: "proxy".into(),
                message: format!("'{}': {message}", args.proxy),
                suggestion: args.proxy.split_once("://").map(|(_, rest)| {
                    format!("drop the scheme, the backend is always plain http: '{rest}'")
                }),
            });
        })
        .ok();

    for (field, path) in [("cert", &args.cert), ("key", &args.key)] {
        if let Err(message) = validate_pem_path(path) {
            errors.push(ValidationError {
                field: field.into(),
                message,
                suggestion: Some(format!(
                    "pass --{field} <file> or set TLSTERM_{}",
                    field.to_uppercase()
                )),
            });
        }
    }

    match (listen, backend) {
        (Some(listen), Some(backend)) if errors.is_empty() => Ok(ServeConfig {
            listen,
            redirect,
            proxy: ProxyConfig { backend },
            tls: TlsPaths {
                cert: args.cert.clone(),
                key: args.key.clone(),
            },
        }),
        _ => Err(errors),
    }
}

#[must_use]
pub fn format_validation_report(config: &ServeConfig) -> String {
    let mut lines = vec![
        format!("  listen:   https://{}", config.listen),
        format!("  backend:  http://{}", config.proxy.backend()),
        format!("  cert:     {}", config.tls.cert.display()),
        format!("  key:      {}", config.tls.key.display()),
    ];
    if let Some(redirect) = config.redirect {
        lines.push(format!("  redirect: http://{redirect} -> https"));
    }
    format!("configuration is valid\n{}", lines.join("\n"))
}
