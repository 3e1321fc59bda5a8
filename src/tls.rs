//! TLS certificate loading for the HTTPS listener.

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsPaths;
use crate::error::TlstermError;

/// Install `ring` as the process-wide rustls crypto provider.
///
/// axum-server is built without a provider of its own, so this has to run
/// before any `ServerConfig` is built. Repeated calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Load the certificate chain and private key into a rustls server config.
///
/// Existence is checked first so the error names the missing file instead
/// of surfacing a bare `NotFound` from the PEM reader.
pub async fn load_tls_config(paths: &TlsPaths) -> Result<RustlsConfig, TlstermError> {
    if !tokio::fs::try_exists(&paths.cert).await.unwrap_or(false) {
        return Err(TlstermError::CertificateNotFound {
            path: paths.cert.clone(),
        });
    }
    if !tokio::fs::try_exists(&paths.key).await.unwrap_or(false) {
        return Err(TlstermError::KeyNotFound {
            path: paths.key.clone(),
        });
    }

    install_crypto_provider();

    RustlsConfig::from_pem_file(&paths.cert, &paths.key)
        .await
        .map_err(|source| TlstermError::TlsConfig {
            cert: paths.cert.clone(),
            key: paths.key.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn missing_certificate_is_named() {
        let paths = TlsPaths {
            cert: PathBuf::from("/nonexistent/cert.pem"),
            key: PathBuf::from("/nonexistent/key.pem"),
        };
        let err = load_tls_config(&paths).await.unwrap_err();
        assert!(matches!(err, TlstermError::CertificateNotFound { .. }));
    }

    #[tokio::test]
    async fn missing_key_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        std::fs::write(&cert, "not really a cert").unwrap();
        let paths = TlsPaths {
            cert,
            key: dir.path().join("key.pem"),
        };
        let err = load_tls_config(&paths).await.unwrap_err();
        assert!(matches!(err, TlstermError::KeyNotFound { .. }));
    }

    #[tokio::test]
    async fn garbage_pem_is_a_tls_error() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        std::fs::write(&cert, "not really a cert").unwrap();
        std::fs::write(&key, "not really a key").unwrap();
        let err = load_tls_config(&TlsPaths { cert, key }).await.unwrap_err();
        assert!(matches!(err, TlstermError::TlsConfig { .. }));
    }

    #[tokio::test]
    async fn self_signed_pair_loads() {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");
        std::fs::write(&cert_path, cert.pem()).unwrap();
        std::fs::write(&key_path, key_pair.serialize_pem()).unwrap();

        let paths = TlsPaths {
            cert: cert_path,
            key: key_path,
        };
        assert!(load_tls_config(&paths).await.is_ok());
    }
}
