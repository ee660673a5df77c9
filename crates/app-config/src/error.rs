// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid backtest settings: {0}")]
    InvalidSettings(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
