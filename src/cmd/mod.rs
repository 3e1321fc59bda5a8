//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`validate`].

pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::TlstermError;

pub async fn dispatch(cli: Cli) -> Result<(), TlstermError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  tlsterm v{version} \u{2014} TLS-terminating reverse proxy\n\n  \
         No command provided. To get started:\n\n    \
         tlsterm validate --cert cert.pem --key key.pem    Check your key pair\n    \
         tlsterm run --proxy 127.0.0.1:3000                Serve https://127.0.0.1:1443\n    \
         tlsterm --help                                    See all commands and options\n"
    );
}
