// In crates/backtester/src/lib.rs

pub mod types;

use analytics::engine::AnalyticsEngine;
use analytics::types::{PerformanceReport, Trade};
use core_types::{Error, Granularity, Market, PriceSeries, Result};
use execution::{Account, Position, TradeSimulator};
use rust_decimal::Decimal;
use serde::Serialize;
use strategies::{MACrossover, MACrossoverSettings, Strategy};
use tracing::{info, warn};

pub use types::BacktestSettings;

/// The result of one backtest run.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestOutcome {
    /// Closed trades, oldest first.
    pub trades: Vec<Trade>,
    pub report: PerformanceReport,
    /// Balances after the last bar.
    pub account: Account,
    /// Set when the data ends with a position still open. Not part of `trades`.
    pub open_position: Option<Position>,
}

/// The main engine for running historical backtests.
///
/// A `Backtester` holds no per-run state: every call to [`Backtester::run`]
/// builds its own simulator, so one instance can be shared across threads.
pub struct Backtester {
    settings: BacktestSettings,
    /// A single strategy instance to test.
    strategy: Box<dyn Strategy + Send + Sync>,
}

impl Backtester {
    /// Creates a backtester running the EMA crossover strategy from `settings`.
    pub fn new(settings: BacktestSettings) -> Result<Self> {
        settings.validate()?;
        let strategy = MACrossover::new(settings.ma_crossover)?;
        Self::with_strategy(settings, Box::new(strategy))
    }

    /// Creates a backtester around any strategy; the crossover spans in
    /// `settings` are ignored.
    pub fn with_strategy(
        settings: BacktestSettings,
        strategy: Box<dyn Strategy + Send + Sync>,
    ) -> Result<Self> {
        if settings.buy_order_quote <= Decimal::ZERO {
            return Err(Error::InvalidNotional { value: settings.buy_order_quote });
        }
        Ok(Self { settings, strategy })
    }

    pub fn settings(&self) -> &BacktestSettings {
        &self.settings
    }

    /// Runs the full pipeline over `series`: signals, then simulated fills,
    /// then the performance report.
    pub fn run(&self, series: &PriceSeries) -> Result<BacktestOutcome> {
        let settings = &self.settings;
        if series.is_empty() {
            return Err(Error::EmptySeries);
        }
        if !series.is_strictly_ascending() {
            warn!(
                market = %settings.market,
                "Price series timestamps are not strictly ascending; crossover results may be meaningless."
            );
        }

        info!(
            market = %settings.market,
            granularity = %settings.granularity,
            strategy = self.strategy.name(),
            bars = series.len(),
            "Starting backtest."
        );

        // --- 1. Signals ---
        let signals = self.strategy.generate_signals(series)?;

        // --- 2. Simulated fills ---
        let simulator = TradeSimulator::new(settings.initial_quote_balance, settings.buy_order_quote)?;
        let outcome = simulator.run(series, &signals, &settings.market, settings.granularity)?;

        // --- 3. Analytics ---
        let report = AnalyticsEngine::new().calculate(settings.initial_quote_balance, &outcome.trades);

        info!(
            trades = report.total_trades,
            net_profit = %report.net_profit,
            win_rate = report.win_rate,
            "Backtest finished."
        );

        Ok(BacktestOutcome {
            trades: outcome.trades,
            report,
            account: outcome.account,
            open_position: outcome.open_position,
        })
    }
}

/// Runs the EMA 12/26 crossover over `series` and returns the closed trades.
pub fn run_backtest(
    series: &PriceSeries,
    market: Market,
    granularity: Granularity,
    initial_quote_balance: Decimal,
    buy_order_quote: Decimal,
) -> Result<Vec<Trade>> {
    let settings = BacktestSettings {
        market,
        granularity,
        initial_quote_balance,
        buy_order_quote,
        ma_crossover: MACrossoverSettings::default(),
    };
    Ok(Backtester::new(settings)?.run(series)?.trades)
}
