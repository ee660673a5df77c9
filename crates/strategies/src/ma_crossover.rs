// In crates/strategies/src/ma_crossover.rs

use crate::crossover::{CrossoverState, detect_crossovers};
use crate::ema::{EmaSeries, compute_ema};
use crate::signals::{Signal, generate_signals};
use crate::types::MACrossoverSettings;
use crate::Strategy;
use core_types::{Error, PriceSeries, Result};
use tracing::debug;

/// Everything the crossover strategy derives from a price series before it
/// turns the edges into signals.
#[derive(Debug, Clone)]
pub struct CrossoverIndicators {
    pub fast: EmaSeries,
    pub slow: EmaSeries,
    pub states: Vec<CrossoverState>,
}

/// The EMA crossover strategy: buy when the fast EMA crosses above the slow
/// EMA, sell when it crosses back below.
#[derive(Debug, Clone)]
pub struct MACrossover {
    /// The configuration for this strategy instance.
    settings: MACrossoverSettings,
}

impl MACrossover {
    /// Creates a new `MACrossover` strategy instance from its settings.
    ///
    /// The fast span must be strictly shorter than the slow span; span values
    /// themselves are checked when the EMAs are computed.
    pub fn new(settings: MACrossoverSettings) -> Result<Self> {
        if settings.fast_span >= settings.slow_span {
            return Err(Error::InvalidSpanOrder {
                fast: settings.fast_span,
                slow: settings.slow_span,
            });
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MACrossoverSettings {
        &self.settings
    }

    /// Computes both EMAs and the per-bar crossover states.
    pub fn indicators(&self, series: &PriceSeries) -> Result<CrossoverIndicators> {
        let fast = compute_ema(series, self.settings.fast_span)?;
        let slow = compute_ema(series, self.settings.slow_span)?;
        let states = detect_crossovers(&fast, &slow)?;
        Ok(CrossoverIndicators { fast, slow, states })
    }
}

impl Strategy for MACrossover {
    fn name(&self) -> &'static str {
        "EmaCrossover"
    }

    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<Signal>> {
        let indicators = self.indicators(series)?;
        let signals = generate_signals(&indicators.states);

        debug!(
            fast_span = self.settings.fast_span,
            slow_span = self.settings.slow_span,
            bars = signals.len(),
            buys = signals.iter().filter(|s| s.buy).count(),
            sells = signals.iter().filter(|s| s.sell).count(),
            "Generated crossover signals."
        );

        Ok(signals)
    }
}
