// In crates/app-config/src/lib.rs

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, CoinbaseSettings, Settings};

/// Loads the application settings from the `config/` directory.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    load_settings_from("config")
}

/// Same as [`load_settings`], reading the TOML files from `config_dir`.
pub fn load_settings_from(config_dir: &str) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let builder = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::with_name(&format!("{}/base", config_dir)))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&format!("{}/{}", config_dir, environment)).required(false))
        // 3. Load settings from environment variables (e.g., `APP_BACKTEST__BUY_ORDER_QUOTE=500`).
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"));

    finish(builder)
}

/// Builds settings from a single TOML document, without files or environment.
pub fn settings_from_toml(content: &str) -> Result<Settings> {
    finish(Config::builder().add_source(File::from_str(content, FileFormat::Toml)))
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.backtest.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Granularity, Market};
    use rust_decimal_macros::dec;

    const FULL: &str = r#"
        [app]
        environment = "test"
        log_level = "debug"
        optimizer_cores = 2

        [backtest]
        market = "ETH-EUR"
        granularity = 900
        initial_quote_balance = "2500"
        buy_order_quote = "250.5"

        [backtest.ma_crossover]
        fast_span = 5
        slow_span = 20

        [coinbase]
        rest_base_url = "http://localhost:8080"
    "#;

    #[test]
    fn parses_every_section() {
        let settings = settings_from_toml(FULL).unwrap();

        assert_eq!(settings.app.log_level, "debug");
        assert_eq!(settings.app.optimizer_cores, 2);
        assert_eq!(settings.backtest.market, Market::from("ETH-EUR"));
        assert_eq!(settings.backtest.granularity, Granularity(900));
        assert_eq!(settings.backtest.initial_quote_balance, dec!(2500));
        assert_eq!(settings.backtest.buy_order_quote, dec!(250.5));
        assert_eq!(settings.backtest.ma_crossover.fast_span, 5);
        assert_eq!(settings.backtest.ma_crossover.slow_span, 20);
        assert_eq!(settings.coinbase.rest_base_url, "http://localhost:8080");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings = settings_from_toml("").unwrap();

        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.backtest.market, Market::from("BTC-GBP"));
        assert_eq!(settings.backtest.granularity, Granularity(3600));
        assert_eq!(settings.backtest.initial_quote_balance, dec!(1000));
        assert_eq!(settings.backtest.buy_order_quote, dec!(1000));
        assert_eq!(settings.backtest.ma_crossover.fast_span, 12);
        assert_eq!(settings.backtest.ma_crossover.slow_span, 26);
        assert_eq!(settings.coinbase.rest_base_url, "https://api.exchange.coinbase.com");
    }

    #[test]
    fn rejects_inverted_spans() {
        let toml = r#"
            [backtest.ma_crossover]
            fast_span = 26
            slow_span = 12
        "#;
        assert!(matches!(
            settings_from_toml(toml),
            Err(Error::InvalidSettings(core_types::Error::InvalidSpanOrder { fast: 26, slow: 12 }))
        ));
    }

    #[test]
    fn ships_a_loadable_base_file() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config");
        let settings = load_settings_from(dir).unwrap();
        assert!(settings.backtest.buy_order_quote > dec!(0));
    }
}
