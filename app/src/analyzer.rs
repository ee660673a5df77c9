// In app/src/analyzer.rs

use crate::optimizer::OptimizationResult;
use analytics::types::PerformanceReport;
use strategies::MACrossoverSettings;

/// Runs with fewer closed trades than this are too thin to rank.
const MINIMUM_TRADES_THRESHOLD: u32 = 3;

#[derive(Debug)]
pub struct RankedReport {
    pub score: f64,
    pub settings: MACrossoverSettings,
    pub report: PerformanceReport,
}

/// Scores the results of an optimization job, best first.
pub fn analyze_and_rank_results(results: Vec<OptimizationResult>) -> Vec<RankedReport> {
    let total_reports = results.len();

    let mut ranked_reports: Vec<RankedReport> = results
        .into_iter()
        .filter_map(|result| {
            // 1. Filter out runs with too few trades
            if result.report.total_trades < MINIMUM_TRADES_THRESHOLD {
                return None;
            }

            // 2. Calculate the score
            let score = calculate_score(&result.report);

            Some(RankedReport {
                score,
                settings: result.settings,
                report: result.report,
            })
        })
        .collect();

    tracing::info!(
        total_reports,
        passing_reports = ranked_reports.len(),
        "Finished scoring reports."
    );

    // 3. Sort by score in descending order (higher is better)
    ranked_reports.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    ranked_reports
}

/// The multi-objective scoring function.
/// Higher scores are better.
fn calculate_score(report: &PerformanceReport) -> f64 {
    const NET_PROFIT_WEIGHT: f64 = 1.0;
    const PROFIT_FACTOR_WEIGHT: f64 = 10.0;
    const WIN_RATE_WEIGHT: f64 = 0.2;

    // A run with no losing trades has an infinite profit factor.
    let capped_profit_factor = report.profit_factor.min(5.0);

    (report.net_profit_percentage * NET_PROFIT_WEIGHT)
        + (capped_profit_factor * PROFIT_FACTOR_WEIGHT)
        + (report.win_rate * WIN_RATE_WEIGHT)
}
