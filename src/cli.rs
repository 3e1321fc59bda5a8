//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate), and their associated argument structs.
//! Every listener/backend/TLS flag has an environment variable
//! equivalent for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "tlsterm",
    version,
    about = "TLS-terminating reverse proxy for a plain HTTP backend",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        tlsterm validate                              Check cert, key and addresses\n  \
        tlsterm run                                   Serve :1443, forward to 127.0.0.1:3000\n  \
        tlsterm run --proxy 10.0.0.7:8080 --pretty    Forward to another backend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the TLS-terminating proxy
    Run(Box<RunArgs>),

    /// Check the startup configuration without serving
    Validate(ValidateArgs),
}

/// Listener, backend and certificate settings shared by `run` and `validate`.
#[derive(Args, Clone, Debug)]
pub struct ProxyArgs {
    /// Address to listen on for HTTPS
    #[arg(long, env = "TLSTERM_ADDR", default_value = "127.0.0.1:1443")]
    pub addr: String,

    /// Backend address (host:port) that requests are proxied to
    #[arg(long, env = "TLSTERM_PROXY", default_value = "127.0.0.1:3000")]
    pub proxy: String,

    /// PEM certificate chain file
    #[arg(long, env = "TLSTERM_CERT", default_value = "./localhost.pem")]
    pub cert: PathBuf,

    /// PEM private key file
    #[arg(long, env = "TLSTERM_KEY", default_value = "./localhost-key.pem")]
    pub key: PathBuf,

    /// Plain HTTP address whose requests are all redirected to HTTPS
    #[arg(long, env = "TLSTERM_REDIRECT_ADDR")]
    pub redirect_addr: Option<String>,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        tlsterm run --cert cert.pem --key key.pem            Explicit key pair\n  \
        tlsterm run --addr 0.0.0.0:443 --redirect-addr 0.0.0.0:80\n  \
        tlsterm run --json -l debug                           Verbose JSON logs")]
pub struct RunArgs {
    #[command(flatten)]
    pub proxy: ProxyArgs,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Seconds to let in-flight requests finish after a shutdown signal
    #[arg(
        long,
        env = "SHUTDOWN_GRACE_SECS",
        default_value_t = 10,
        help_heading = "Tuning"
    )]
    pub shutdown_grace_secs: u64,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub proxy: ProxyArgs,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Everything, including connection-level events from the TLS stack
    Trace,
    /// Adds backend status and latency for every exchange
    Debug,
    /// Startup, shutdown and one line per completed exchange
    Info,
    /// Only failed exchanges and degraded behaviour
    Warn,
    Error,
}

impl From<&LogLevel> for tracing::Level {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults_match_documented_addresses() {
        let cli = Cli::try_parse_from(["tlsterm", "run"]).unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.proxy.addr, "127.0.0.1:1443");
        assert_eq!(args.proxy.proxy, "127.0.0.1:3000");
        assert_eq!(args.proxy.cert, PathBuf::from("./localhost.pem"));
        assert_eq!(args.proxy.key, PathBuf::from("./localhost-key.pem"));
        assert!(args.proxy.redirect_addr.is_none());
        assert_eq!(args.shutdown_grace_secs, 10);
    }

    #[test]
    fn pretty_and_json_conflict() {
        assert!(Cli::try_parse_from(["tlsterm", "run", "--pretty", "--json"]).is_err());
    }

    #[test]
    fn validate_accepts_proxy_flags() {
        let cli = Cli::try_parse_from([
            "tlsterm",
            "validate",
            "--proxy",
            "backend:8080",
            "--format",
            "json",
        ])
        .unwrap();
        let Some(Commands::Validate(args)) = cli.command else {
            panic!("expected validate subcommand");
        };
        assert_eq!(args.proxy.proxy, "backend:8080");
        assert!(matches!(args.format, ValidateFormat::Json));
    }

    #[test]
    fn log_level_flag_maps_to_tracing_level() {
        let cli = Cli::try_parse_from(["tlsterm", "run", "-l", "debug"]).unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(tracing::Level::from(&args.log_level), tracing::Level::DEBUG);
    }
}
