// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: status {status}, message: {message}")]
    ApiError { status: u16, message: String },
    #[error("Malformed candle at row {row}: {reason}")]
    InvalidCandle { row: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
