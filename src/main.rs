use clap::Parser;
use tao_income_api::cli::{self, Cli};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = cli::run(Cli::parse()).await {
        tracing::error!(error = %e, "tao-income failed");
        std::process::exit(1);
    }
}
