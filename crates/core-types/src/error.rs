// In crates/core-types/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures raised by the strategy pipeline and the trade simulator.
///
/// All of these describe caller or data-quality defects. None of them is
/// transient, so nothing in the workspace retries on them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid EMA span {span} for a series of {len} bars (span must be > 1 and the series non-empty)")]
    InvalidSpan { span: usize, len: usize },

    #[error("Fast span ({fast}) must be strictly smaller than slow span ({slow})")]
    InvalidSpanOrder { fast: usize, slow: usize },

    #[error("Price series is empty")]
    EmptySeries,

    #[error("Series mismatch: {reason}")]
    SeriesMismatch { reason: String },

    #[error("Invalid price {price} at bar {index}")]
    InvalidPrice { index: usize, price: Decimal },

    #[error("Invalid notional amount: {value}")]
    InvalidNotional { value: Decimal },

    #[error("Decimal overflow while {operation} at bar {index}")]
    ArithmeticOverflow { index: usize, operation: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
