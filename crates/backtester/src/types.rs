// In crates/backtester/src/types.rs

use core_types::{Error, Granularity, Market, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strategies::MACrossoverSettings;

/// Everything one backtest run needs besides the price data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestSettings {
    /// The market the candles belong to (e.g., "BTC-GBP").
    pub market: Market,
    /// Candle width in seconds.
    pub granularity: Granularity,
    /// Quote currency the account starts with.
    pub initial_quote_balance: Decimal,
    /// Fixed quote amount committed to every buy.
    pub buy_order_quote: Decimal,
    pub ma_crossover: MACrossoverSettings,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            market: Market::from("BTC-GBP"),
            granularity: Granularity(3600),
            initial_quote_balance: dec!(1000),
            buy_order_quote: dec!(1000),
            ma_crossover: MACrossoverSettings::default(),
        }
    }
}

impl BacktestSettings {
    /// Checks the numeric invariants a run relies on.
    pub fn validate(&self) -> Result<()> {
        if self.buy_order_quote <= dec!(0) {
            return Err(Error::InvalidNotional { value: self.buy_order_quote });
        }
        if self.initial_quote_balance < dec!(0) {
            return Err(Error::InvalidNotional { value: self.initial_quote_balance });
        }
        let MACrossoverSettings { fast_span, slow_span } = self.ma_crossover;
        for span in [fast_span, slow_span] {
            if span <= 1 {
                return Err(Error::InvalidSpan { span, len: 0 });
            }
        }
        if fast_span >= slow_span {
            return Err(Error::InvalidSpanOrder { fast: fast_span, slow: slow_span });
        }
        Ok(())
    }
}
