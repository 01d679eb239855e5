use clap::Parser;
use tracing_subscriber::EnvFilter;

use hypoview::cli::{self, Cli};
use hypoview::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "hypoview=debug"
    } else {
        "hypoview=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let settings = config::load_settings().await;
    cli::run(cli, settings).await
}
