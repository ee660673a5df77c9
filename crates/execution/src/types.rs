// In crates/execution/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// The simulated account balances for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// Quote currency balance (e.g., GBP).
    pub quote_balance: Decimal,
    /// Base currency balance (e.g., BTC).
    pub base_balance: Decimal,
}

impl Account {
    /// Creates an account holding only quote currency.
    pub fn new(initial_quote_balance: Decimal) -> Self {
        Self {
            quote_balance: initial_quote_balance,
            base_balance: Decimal::ZERO,
        }
    }
}

/// The single open position, from its buy fill until the sell fill consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    /// Index of the bar the buy filled on.
    pub entry_index: usize,
    pub entry_timestamp: DateTime<Utc>,
    pub entry_price: Decimal,
    pub base_amount: Decimal,
    pub quote_spent: Decimal,
    pub quote_balance_after_entry: Decimal,
}
