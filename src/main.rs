use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = tlsterm::cli::Cli::parse();
    if let Err(e) = tlsterm::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
