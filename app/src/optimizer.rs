// In app/src/optimizer.rs

use analytics::types::PerformanceReport;
use anyhow::{Context, Result};
use backtester::{BacktestSettings, Backtester};
use core_types::PriceSeries;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use strategies::MACrossoverSettings;

// --- Structs for deserializing optimizer.toml ---

#[derive(Deserialize, Debug)]
pub struct OptimizerConfig {
    pub job: JobSettings,
    pub ma_crossover_params: MaCrossoverParams,
}

#[derive(Deserialize, Debug)]
pub struct JobSettings {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct MaCrossoverParams {
    pub fast_span: ParamValue,
    pub slow_span: ParamValue,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)] // Allows serde to try parsing as one variant, then the next
pub enum ParamValue {
    Fixed(usize),
    Range {
        start: usize,
        end: usize,
        step: Option<usize>,
    },
}

impl ParamValue {
    /// Expands the value into every span it covers; ranges include `end`.
    fn expand(&self) -> Result<Vec<usize>> {
        match *self {
            ParamValue::Fixed(value) => Ok(vec![value]),
            ParamValue::Range { start, end, step } => {
                let step = step.unwrap_or(1);
                if step == 0 {
                    anyhow::bail!("Range step must be at least 1 (start = {start}, end = {end})");
                }
                Ok((start..=end).step_by(step).collect())
            }
        }
    }
}

/// One finished run of the sweep.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub settings: MACrossoverSettings,
    pub report: PerformanceReport,
}

// --- Public API for the Optimizer Module ---

pub fn load_optimizer_config() -> Result<OptimizerConfig> {
    let content = fs::read_to_string("config/optimizer.toml")
        .context("Failed to read config/optimizer.toml")?;
    parse_optimizer_config(&content)
}

pub fn parse_optimizer_config(content: &str) -> Result<OptimizerConfig> {
    toml::from_str(content).context("Failed to parse optimizer.toml")
}

/// Builds every (fast, slow) pair of the grid that the crossover strategy accepts.
pub fn generate_parameter_sets(config: &OptimizerConfig) -> Result<Vec<MACrossoverSettings>> {
    let params = &config.ma_crossover_params;
    let fast_spans = params.fast_span.expand()?;
    let slow_spans = params.slow_span.expand()?;

    let sets: Vec<MACrossoverSettings> = fast_spans
        .iter()
        .flat_map(|&fast_span| {
            slow_spans
                .iter()
                .map(move |&slow_span| MACrossoverSettings { fast_span, slow_span })
        })
        .filter(|s| s.fast_span > 1 && s.fast_span < s.slow_span)
        .collect();

    tracing::debug!(
        grid = fast_spans.len() * slow_spans.len(),
        valid = sets.len(),
        "Expanded parameter grid."
    );
    Ok(sets)
}

/// The main parallel engine for running an optimization job.
///
/// Every parameter set gets its own `Backtester` over the shared series. A
/// failing run is logged and left out of the results.
pub fn run_optimization(
    cores: usize,
    base: &BacktestSettings,
    series: &PriceSeries,
    param_sets: Vec<MACrossoverSettings>,
) -> Result<Vec<OptimizationResult>> {
    tracing::info!(cores, "Configuring Rayon thread pool.");
    let pool = ThreadPoolBuilder::new()
        .num_threads(cores.max(1))
        .build()
        .context("Failed to build Rayon thread pool")?;

    let results = pool.install(|| {
        param_sets
            .par_iter()
            .filter_map(|&params| match run_single_backtest(base, series, params) {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        fast_span = params.fast_span,
                        slow_span = params.slow_span,
                        "A single backtest run failed."
                    );
                    None
                }
            })
            .collect::<Vec<_>>()
    });

    tracing::info!(completed = results.len(), "All backtests finished.");
    Ok(results)
}

fn run_single_backtest(
    base: &BacktestSettings,
    series: &PriceSeries,
    params: MACrossoverSettings,
) -> core_types::Result<OptimizationResult> {
    let settings = BacktestSettings {
        ma_crossover: params,
        ..base.clone()
    };
    let outcome = Backtester::new(settings)?.run(series)?;
    Ok(OptimizationResult {
        settings: params,
        report: outcome.report,
    })
}
