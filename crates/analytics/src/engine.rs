// In crates/analytics/src/engine.rs

use crate::types::{PerformanceReport, Trade};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// The engine responsible for calculating performance metrics from trade data.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates a performance report from the closed-trade ledger.
    ///
    /// With no trades the report is all zeros except `final_quote_balance`,
    /// which stays at the initial balance.
    pub fn calculate(&self, initial_quote_balance: Decimal, trades: &[Trade]) -> PerformanceReport {
        let mut report = PerformanceReport::new();
        report.final_quote_balance = initial_quote_balance;
        if trades.is_empty() {
            return report;
        }

        // --- Counts ---
        report.total_trades = trades.len() as u32;
        report.winning_trades = trades.iter().filter(|t| t.is_winner()).count() as u32;
        report.losing_trades = trades.iter().filter(|t| t.is_loser()).count() as u32;
        report.win_rate = (report.winning_trades as f64 / report.total_trades as f64) * 100.0;

        // --- Net P&L (Absolute & Percentage) ---
        report.net_profit = trades.iter().map(|t| t.profit).sum();
        if initial_quote_balance > dec!(0) {
            report.net_profit_percentage = (report.net_profit / initial_quote_balance)
                .to_f64()
                .unwrap_or(0.0)
                * 100.0;
        }

        // --- Profit Factor ---
        let gross_profit: Decimal = trades.iter().filter(|t| t.is_winner()).map(|t| t.profit).sum();
        let gross_loss: Decimal = trades
            .iter()
            .filter(|t| t.is_loser())
            .map(|t| t.profit)
            .sum::<Decimal>()
            .abs();
        report.profit_factor = if gross_loss > dec!(0) {
            (gross_profit / gross_loss).to_f64().unwrap_or(0.0)
        } else if gross_profit > dec!(0) {
            f64::INFINITY // Pure profit
        } else {
            0.0
        };

        // --- Per-trade statistics ---
        let count = Decimal::from(trades.len());
        report.average_margin_percent = trades.iter().map(|t| t.margin_percent).sum::<Decimal>() / count;
        report.best_trade = trades.iter().map(|t| t.profit).max().unwrap_or_default();
        report.worst_trade = trades.iter().map(|t| t.profit).min().unwrap_or_default();

        let total_duration_secs: i64 = trades.iter().map(|t| t.duration().num_seconds()).sum();
        report.avg_trade_duration_secs = total_duration_secs as f64 / trades.len() as f64;

        // The ledger is in fill order, so the last exit carries the closing balance.
        if let Some(last) = trades.last() {
            report.final_quote_balance = last.quote_balance_after_exit;
        }

        report
    }
}
