// In crates/analytics/src/types.rs

use chrono::{DateTime, Duration, Utc};
use core_types::{Granularity, Market};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A comprehensive record of a single closed trade, from entry to exit.
///
/// Only produced when a sell closes an open position; a position still open
/// at the end of the data never becomes a `Trade`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub market: Market,
    pub granularity: Granularity,
    pub entry_timestamp: DateTime<Utc>,
    /// Close price of the bar the buy filled on.
    pub entry_price: Decimal,
    /// Quote balance right after the buy was debited.
    pub quote_balance_after_entry: Decimal,
    pub quote_spent_on_entry: Decimal,
    pub base_amount_acquired: Decimal,
    pub exit_timestamp: DateTime<Utc>,
    /// Close price of the bar the sell filled on.
    pub exit_price: Decimal,
    pub quote_received_on_exit: Decimal,
    /// Quote balance right after the sale proceeds were credited.
    pub quote_balance_after_exit: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

impl Trade {
    pub fn duration(&self) -> Duration {
        self.exit_timestamp - self.entry_timestamp
    }

    pub fn is_winner(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    pub fn is_loser(&self) -> bool {
        self.profit < Decimal::ZERO
    }
}

/// A summary of a strategy's closed trades over a backtest window.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PerformanceReport {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub net_profit: Decimal,
    pub net_profit_percentage: f64,
    pub win_rate: f64,
    /// Gross profit over gross loss; `+inf` when no trade lost money.
    /// JSON has no infinity, so that case is written as the string `"inf"`.
    #[serde(with = "unbounded_f64")]
    pub profit_factor: f64,
    pub average_margin_percent: Decimal,
    pub best_trade: Decimal,
    pub worst_trade: Decimal,
    pub avg_trade_duration_secs: f64,
    pub final_quote_balance: Decimal,
}

impl PerformanceReport {
    /// Creates a new, empty report with zero values.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Serializes an `f64` that may be infinite. Finite values stay JSON numbers.
mod unbounded_f64 {
    use serde::Deserialize;
    use serde::de::{self, Deserializer};
    use serde::ser::Serializer;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(de::Error::invalid_value(de::Unexpected::Str(other), &"a number, \"inf\" or \"-inf\"")),
            },
        }
    }
}
