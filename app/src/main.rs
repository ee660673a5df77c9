// In app/src/main.rs

use anyhow::{Context, Result};
use api_client::{CoinbaseClient, MarketDataProvider};
use backtester::{BacktestSettings, Backtester};
use clap::{Parser, Subcommand};
use core_types::{Granularity, Market, PriceSeries};
use std::time::Instant;
use tokio::task;
use tracing_subscriber::prelude::*;

mod analyzer;
mod optimizer;
mod report;

use crate::optimizer::{generate_parameter_sets, load_optimizer_config, run_optimization};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Backtests an EMA crossover strategy on historical candles.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a historical backtest of the EMA crossover strategy.
    Backtest {
        /// The market to backtest (e.g., "BTC-GBP"). Overrides the configured market.
        #[arg(short, long)]
        market: Option<String>,

        /// Candle width in seconds (e.g., 3600). Overrides the configured granularity.
        #[arg(short, long)]
        granularity: Option<u32>,

        /// Print the outcome as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Runs a parameter sweep over EMA spans described in config/optimizer.toml.
    Optimize,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings().context("Failed to load settings from config/")?;

    let level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("reqwest", tracing::Level::WARN)
            .with_target("hyper_util", tracing::Level::WARN)
            .with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    // Parse command-line arguments.
    let cli = Cli::parse();

    tracing::info!(environment = %settings.app.environment, "Starting EMA backtest application");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Backtest {
            market,
            granularity,
            json,
        } => {
            let mut backtest_settings = settings.backtest.clone();
            if let Some(market) = market {
                backtest_settings.market = Market(market);
            }
            if let Some(granularity) = granularity {
                backtest_settings.granularity = Granularity(granularity);
            }
            handle_backtest(&settings.coinbase, backtest_settings, json).await?;
        }
        Commands::Optimize => {
            handle_optimize(settings).await?;
        }
    }

    tracing::info!("Application has finished successfully.");

    Ok(())
}

/// Fetches candles and orders them oldest first, the order the backtester expects.
async fn fetch_price_series(
    coinbase: &app_config::CoinbaseSettings,
    market: &Market,
    granularity: Granularity,
) -> Result<PriceSeries> {
    let client = CoinbaseClient::new(coinbase)?;
    tracing::info!(provider = client.name(), %market, %granularity, "Loading historical data for backtest...");

    let bars = client
        .get_candles(market, granularity)
        .await
        .with_context(|| format!("Failed to fetch candles for {market}"))?;

    let newest_first = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => first.timestamp > last.timestamp,
        _ => false,
    };
    let series = if newest_first {
        PriceSeries::from_descending(bars)
    } else {
        PriceSeries::new(bars)
    };

    tracing::info!("Loaded {} candles.", series.len());
    Ok(series)
}

/// Handles the logic for the `backtest` subcommand.
async fn handle_backtest(
    coinbase: &app_config::CoinbaseSettings,
    settings: BacktestSettings,
    json: bool,
) -> Result<()> {
    settings.validate()?;
    let series = fetch_price_series(coinbase, &settings.market, settings.granularity).await?;

    let backtester = Backtester::new(settings)?;
    let outcome = backtester.run(&series)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        report::print_trades(&outcome.trades);
        report::print_report(&outcome.report);
        if let Some(position) = &outcome.open_position {
            println!(
                "Open position (not booked): {} base bought at {:.2} on {}",
                position.base_amount, position.entry_price, position.entry_timestamp
            );
        }
    }

    Ok(())
}

/// Handles the logic for the `optimize` subcommand.
async fn handle_optimize(settings: app_config::Settings) -> Result<()> {
    let start_time = Instant::now();
    tracing::info!("Starting optimization job...");

    let optimizer_config = load_optimizer_config()?;
    let param_sets = generate_parameter_sets(&optimizer_config)?;
    if param_sets.is_empty() {
        anyhow::bail!("No valid parameter sets were generated.");
    }
    tracing::info!(job = %optimizer_config.job.name, "Starting optimization with {} parameter sets", param_sets.len());

    let base = settings.backtest.clone();
    let series = fetch_price_series(&settings.coinbase, &base.market, base.granularity).await?;

    // Move the heavy, parallel work to a blocking thread.
    let cores = settings.app.optimizer_cores as usize;
    let results = task::spawn_blocking(move || run_optimization(cores, &base, &series, param_sets)).await??;

    let ranked_results = analyzer::analyze_and_rank_results(results);
    report::print_optimization_report(&ranked_results);

    tracing::info!(duration = ?start_time.elapsed(), "Optimization job and analysis finished.");
    Ok(())
}
