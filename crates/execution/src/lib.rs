// In crates/execution/src/lib.rs

pub mod ledger;
pub mod simulated;
pub mod types;

// Re-export public types
pub use ledger::TradeLedger;
pub use simulated::{SimulationOutcome, TradeSimulator};
pub use types::{Account, Position};
