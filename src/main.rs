//! envset - inspect resolved application settings

use clap::Parser;
use envset::cli::{Cli, Outcome};
use envset::{Result, Settings};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug);

    match run(cli).await {
        Ok(Outcome::Success) => {}
        Ok(Outcome::Mismatch) => std::process::exit(1),
        Err(e) => {
            error!("Error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    info!("Starting envset");

    let settings = Settings::new().warn_on_unregistered_override(true);
    let settings = cli.load_settings(settings).await?;

    cli.execute(&settings)
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "envset=debug" } else { "envset=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
