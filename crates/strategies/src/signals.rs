// In crates/strategies/src/signals.rs

use crate::crossover::CrossoverState;
use serde::Serialize;

/// The trading action attached to one bar. Both flags default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub buy: bool,
    pub sell: bool,
}

impl Signal {
    pub const HOLD: Signal = Signal { buy: false, sell: false };
    pub const BUY: Signal = Signal { buy: true, sell: false };
    pub const SELL: Signal = Signal { buy: false, sell: true };
}

impl From<&CrossoverState> for Signal {
    fn from(state: &CrossoverState) -> Self {
        Signal {
            buy: state.crossed_up,
            sell: state.crossed_down,
        }
    }
}

/// Maps crossover edges to buy/sell flags, one signal per bar.
///
/// A golden cross (fast crossing above slow) buys; a death cross sells.
pub fn generate_signals(states: &[CrossoverState]) -> Vec<Signal> {
    states.iter().map(Signal::from).collect()
}
