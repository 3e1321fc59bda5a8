//! Unified error types for tlsterm.
//!
//! Defines [`TlstermError`] (the main crate error enum) and
//! [`ValidationError`] for startup configuration failures. Both use
//! `thiserror` for `Display` and `Error` derives. Error messages
//! include contextual hints to guide the user toward a fix.

use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TlstermError {
    #[error(
        "Refusing to start, {} configuration problem(s):\n{}",
        errors.len(),
        format_errors(errors)
    )]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Certificate file not found: {}", path.display())]
    CertificateNotFound { path: PathBuf },

    #[error("Private key file not found: {}", path.display())]
    KeyNotFound { path: PathBuf },

    #[error(
        "Failed to load TLS certificate/key ({} / {}): {source}",
        cert.display(),
        key.display()
    )]
    TlsConfig {
        cert: PathBuf,
        key: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid backend address '{address}': {reason}")]
    InvalidBackend { address: String, reason: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
