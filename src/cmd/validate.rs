//! `tlsterm validate` — check the startup configuration.
//!
//! Runs the same checks as `run` (addresses, backend, certificate and key
//! files, PEM parsing) without binding any socket, reporting results in
//! either human-readable text or machine-readable JSON format.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::validation;
use crate::error::{TlstermError, ValidationError};
use crate::tls;

pub async fn execute(args: &ValidateArgs) -> Result<(), TlstermError> {
    let errors = match validation::validate(&args.proxy) {
        Ok(config) => match tls::load_tls_config(&config.tls).await {
            Ok(_) => {
                report_valid(args, &config);
                return Ok(());
            }
            Err(e) => vec![ValidationError {
                field: "cert/key".into(),
                message: e.to_string(),
                suggestion: Some("both files must be PEM encoded".into()),
            }],
        },
        Err(errors) => errors,
    };

    match args.format {
        ValidateFormat::Text => {
            eprintln!("\u{2717} configuration has {} errors\n", errors.len());
            for error in &errors {
                eprintln!("{error}");
            }
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": false,
                    "errors": errors,
                })
            );
        }
    }
    Err(TlstermError::ConfigValidation { errors })
}

fn report_valid(args: &ValidateArgs, config: &crate::config::ServeConfig) {
    match args.format {
        ValidateFormat::Text => {
            println!("\u{2713} {}", validation::format_validation_report(config));
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "listen": config.listen.to_string(),
                    "backend": config.proxy.backend().as_str(),
                    "redirect": config.redirect.map(|addr| addr.to_string()),
                })
            );
        }
    }
}
