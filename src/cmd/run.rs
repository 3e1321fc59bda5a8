//! `tlsterm run` — start the proxy.
//!
//! Validates the startup configuration, loads the certificate pair, and
//! serves the HTTPS listener (plus the optional plaintext redirect
//! listener) until a shutdown signal arrives. In-flight requests get
//! `--shutdown-grace-secs` to finish.

use std::sync::Arc;
use std::time::Duration;

use axum_server::Handle;

use crate::cli::RunArgs;
use crate::config::validation;
use crate::error::TlstermError;
use crate::logging;
use crate::server::{self, AppState};
use crate::tls;

pub async fn execute(args: RunArgs) -> Result<(), TlstermError> {
    let log_format = logging::LogFormat::from_flags(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = validation::validate(&args.proxy)
        .map_err(|errors| TlstermError::ConfigValidation { errors })?;
    let tls_config = tls::load_tls_config(&config.tls).await?;

    let state = Arc::new(AppState::new(config.proxy.clone()));
    let router = server::build_router(state);

    let handle = Handle::new();
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

    let redirect_task = match config.redirect {
        Some(redirect_addr) => {
            let listener = tokio::net::TcpListener::bind(redirect_addr).await?;
            let redirect_router = server::build_redirect_router(config.listen.port());
            tracing::info!(addr = %redirect_addr, "plaintext redirect listener started");
            Some(tokio::spawn(async move {
                axum::serve(listener, redirect_router)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.changed().await;
                    })
                    .await
            }))
        }
        None => None,
    };

    let grace = Duration::from_secs(args.shutdown_grace_secs);
    let signal_handle = handle.clone();
    let listen = config.listen;
    let has_redirect = config.redirect.is_some();
    tokio::spawn(async move {
        let signal = server::shutdown_signal().await;
        tracing::info!(
            signal,
            addr = %listen,
            grace_secs = grace.as_secs(),
            "draining HTTPS listener"
        );
        signal_handle.graceful_shutdown(Some(grace));
        if has_redirect {
            tracing::info!("closing plaintext redirect listener");
        }
        let _ = shutdown_tx.send(true);
    });

    tracing::info!(
        addr = %config.listen,
        backend = %config.proxy.backend(),
        cert = %config.tls.cert.display(),
        "tlsterm started"
    );

    server::serve_tls(config.listen, tls_config, router, handle).await?;

    if let Some(task) = redirect_task {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "redirect listener failed"),
            Err(e) => tracing::error!(error = %e, "redirect listener task failed"),
        }
    }

    tracing::info!("tlsterm stopped");
    Ok(())
}
