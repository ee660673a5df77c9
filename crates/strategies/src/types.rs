// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)] // Clone is needed for the optimizer
pub struct MACrossoverSettings {
    /// Span of the fast ("signal") EMA.
    #[serde(default = "default_fast_span")]
    pub fast_span: usize,
    /// Span of the slow ("trend") EMA.
    #[serde(default = "default_slow_span")]
    pub slow_span: usize,
}

impl Default for MACrossoverSettings {
    fn default() -> Self {
        Self {
            fast_span: default_fast_span(),
            slow_span: default_slow_span(),
        }
    }
}

fn default_fast_span() -> usize {
    12
}

fn default_slow_span() -> usize {
    26
}
