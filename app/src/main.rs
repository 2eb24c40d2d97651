// In app/src/main.rs

use std::str::FromStr;

use anyhow::Result;
use app_config::Settings;
use clap::{Parser, Subcommand};
use engine::{CycleOutcome, Engine};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A crypto trading-signal bot combining RSI, MACD and news sentiment.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Checks for signals every `market.check_interval_secs` until Ctrl-C.
    Run,

    /// Runs a single signal check and exits.
    Check,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings()?;
    init_tracing(&settings);

    tracing::info!(
        environment = %settings.app.environment,
        symbol = %settings.market.symbol,
        interval = %settings.market.interval,
        "Starting signal bot."
    );

    let engine = Engine::from_settings(&settings)?;

    match cli.command {
        Commands::Run => {
            engine.run(shutdown_signal()).await?;
        }
        Commands::Check => match engine.run_once().await? {
            CycleOutcome::Decided { signal, sentiment, alerted } => {
                tracing::info!(%signal, sentiment, alerted, "Check complete.");
            }
            CycleOutcome::Skipped { reason } => {
                tracing::warn!(%reason, "Check skipped.");
            }
        },
    }

    tracing::info!("Signal bot has finished successfully.");

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let parsed = LevelFilter::from_str(&settings.app.log_level).ok();
    let default_level = parsed.unwrap_or(LevelFilter::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        Targets::new()
            .with_target("reqwest", tracing::Level::WARN)
            .with_target("hyper", tracing::Level::WARN)
            .with_default(default_level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();

    if parsed.is_none() {
        tracing::warn!(log_level = %settings.app.log_level, "Unrecognised log level. Falling back to INFO.");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C. Running until killed.");
        std::future::pending::<()>().await;
    }
}
