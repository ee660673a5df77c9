// In app/src/report.rs

use crate::analyzer::RankedReport;
use analytics::types::{PerformanceReport, Trade};

/// Prints one row per closed trade.
pub fn print_trades(trades: &[Trade]) {
    println!("\n--- Trades ---");
    if trades.is_empty() {
        println!("No closed trades.");
        return;
    }
    println!(
        "{:<4} {:<20} {:>12} {:<20} {:>12} {:>12} {:>9}",
        "#", "Entry", "Entry Px", "Exit", "Exit Px", "Profit", "Margin"
    );
    for (i, trade) in trades.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>12.2} {:<20} {:>12.2} {:>12.2} {:>8.2}%",
            i + 1,
            trade.entry_timestamp.format("%Y-%m-%d %H:%M"),
            trade.entry_price,
            trade.exit_timestamp.format("%Y-%m-%d %H:%M"),
            trade.exit_price,
            trade.profit,
            trade.margin_percent,
        );
    }
}

/// Prints a formatted performance report to the console.
pub fn print_report(report: &PerformanceReport) {
    println!("\n--- Backtest Performance Report ---");
    println!("-----------------------------------");
    println!("Net P&L:               {:.2} ({:.2}%)", report.net_profit, report.net_profit_percentage);
    println!("Final Quote Balance:   {:.2}", report.final_quote_balance);
    println!("Profit Factor:         {:.2}", report.profit_factor);
    println!("Win Rate:              {:.2}%", report.win_rate);
    println!(
        "Total Trades:          {} ({} won, {} lost)",
        report.total_trades, report.winning_trades, report.losing_trades
    );
    println!("-----------------------------------");
    println!("Avg. Margin:           {:.2}%", report.average_margin_percent);
    println!("Best Trade:            {:.2}", report.best_trade);
    println!("Worst Trade:           {:.2}", report.worst_trade);
    println!("Avg. Trade Duration:   {:.1}s", report.avg_trade_duration_secs);
    println!("-----------------------------------");
}

/// Prints the top five parameter sets of an optimization job.
pub fn print_optimization_report(ranked_results: &[RankedReport]) {
    println!("\n--- Optimization Job Complete ---");
    println!("---------------------------------");
    println!("Top 5 Parameter Sets by Score:");
    println!("---------------------------------");

    for (i, ranked) in ranked_results.iter().take(5).enumerate() {
        let report = &ranked.report;
        println!("\n[Rank {} | Score: {:.2}]", i + 1, ranked.score);
        println!(
            "  - Spans: fast {} / slow {}",
            ranked.settings.fast_span, ranked.settings.slow_span
        );
        println!(
            "  - P&L: {:.2} ({:.2}%) | Profit Factor: {:.2} | Win Rate: {:.2}% | Trades: {}",
            report.net_profit,
            report.net_profit_percentage,
            report.profit_factor,
            report.win_rate,
            report.total_trades
        );
    }

    println!("\n---------------------------------");
    match ranked_results.first() {
        Some(best) => {
            println!("Recommendation: The parameter set with the highest score is:");
            println!("  fast_span = {}, slow_span = {}", best.settings.fast_span, best.settings.slow_span);
        }
        None => println!("Recommendation: No parameter sets passed the minimum threshold."),
    }
}
