// In crates/strategies/src/lib.rs

use core_types::{PriceSeries, Result};

pub mod crossover;
pub mod ema;
pub mod ma_crossover;
pub mod signals;
pub mod types;

pub use crossover::{CrossoverState, detect_crossovers};
pub use ema::{EmaPoint, EmaSeries, ExponentialMovingAverage, compute_ema};
pub use ma_crossover::{CrossoverIndicators, MACrossover};
pub use signals::{Signal, generate_signals};
pub use types::MACrossoverSettings;

/// The universal interface for a trading strategy.
///
/// A strategy reads a whole price series and produces one `Signal` per bar.
/// It is recomputed from scratch on every call and holds no state between
/// runs, so one instance can serve several backtests at once.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<Signal>>;
}
