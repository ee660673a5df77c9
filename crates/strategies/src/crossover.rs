// In crates/strategies/src/crossover.rs

use crate::ema::EmaSeries;
use core_types::{Error, Result};
use serde::Serialize;

/// The fast/slow relationship at one bar, plus the edge events derived from it.
///
/// Equal EMAs are neither above nor below. Defaults are all `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrossoverState {
    pub fast_above_slow: bool,
    pub fast_below_slow: bool,
    /// `fast_above_slow` switched from false to true on this bar.
    pub crossed_up: bool,
    /// `fast_below_slow` switched from false to true on this bar.
    pub crossed_down: bool,
}

/// Compares two aligned EMA series bar by bar and marks the crossover edges.
///
/// Index 0 never carries an edge: there is no previous bar to compare with.
/// A tie breaks a run, so `below -> tie -> above` still reports `crossed_up`
/// on the `above` bar.
pub fn detect_crossovers(fast: &EmaSeries, slow: &EmaSeries) -> Result<Vec<CrossoverState>> {
    if fast.len() != slow.len() {
        return Err(Error::SeriesMismatch {
            reason: format!("fast EMA has {} points, slow EMA has {}", fast.len(), slow.len()),
        });
    }
    if let Some(index) = fast
        .points
        .iter()
        .zip(&slow.points)
        .position(|(f, s)| f.timestamp != s.timestamp)
    {
        return Err(Error::SeriesMismatch {
            reason: format!("timestamps diverge at index {index}"),
        });
    }

    let mut states: Vec<CrossoverState> = Vec::with_capacity(fast.len());
    let mut previous: Option<CrossoverState> = None;

    for (f, s) in fast.points.iter().zip(&slow.points) {
        let above = f.value > s.value;
        let below = f.value < s.value;

        let state = match previous {
            None => CrossoverState {
                fast_above_slow: above,
                fast_below_slow: below,
                ..CrossoverState::default()
            },
            Some(prev) => CrossoverState {
                fast_above_slow: above,
                fast_below_slow: below,
                crossed_up: above && !prev.fast_above_slow,
                crossed_down: below && !prev.fast_below_slow,
            },
        };

        states.push(state);
        previous = Some(state);
    }

    Ok(states)
}
