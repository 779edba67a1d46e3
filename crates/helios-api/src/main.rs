//! Helios REST API entry point.
//!
//! Binary name: `helios`
//!
//! Loads configuration from the data directory, initializes the database
//! and services, then serves the API.

mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use helios_infra::config::{load_config, provider_api_key, resolve_data_dir};
use http::router::build_router;
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "helios", about = "Conversational-session backend")]
struct Cli {
    /// Bind address override (defaults to config.toml, then 127.0.0.1:8080).
    #[arg(long)]
    bind: Option<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,helios=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir).await;
    let api_key = provider_api_key()?;

    let app_state = AppState::init(&data_dir, &config, api_key).await?;
    let router = build_router(app_state);

    let bind = cli.bind.unwrap_or_else(|| config.bind.clone());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(addr = %bind, "Helios API listening");

    axum::serve(listener, router).await?;
    Ok(())
}
