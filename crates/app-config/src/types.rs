// In crates/app-config/src/types.rs

use serde::Deserialize;

pub use backtester::BacktestSettings;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Market, balances, notional, and EMA spans for the backtest.
    #[serde(default)]
    pub backtest: BacktestSettings,
    /// Settings for the Coinbase candles endpoint.
    #[serde(default)]
    pub coinbase: CoinbaseSettings,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
    /// Worker threads for parameter sweeps.
    pub optimizer_cores: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            optimizer_cores: 4,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CoinbaseSettings {
    /// The REST API base URL for Coinbase Exchange market data.
    pub rest_base_url: String,
}

impl Default for CoinbaseSettings {
    fn default() -> Self {
        Self {
            rest_base_url: "https://api.exchange.coinbase.com".to_string(),
        }
    }
}
