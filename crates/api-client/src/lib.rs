// In crates/api-client/src/lib.rs

use app_config::CoinbaseSettings;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use core_types::{Bar, Granularity, Market};
use rust_decimal::Decimal;
use serde_json::Number;
use std::str::FromStr;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// A source of historical candles.
///
/// Providers return bars in whatever order the upstream API uses; putting
/// them in ascending order is the caller's job.
#[async_trait]
pub trait MarketDataProvider {
    /// The name of the provider (e.g., "Coinbase").
    fn name(&self) -> &'static str;

    async fn get_candles(&self, market: &Market, granularity: Granularity) -> Result<Vec<Bar>>;
}

impl CoinbaseClient {
    /// Constructs a new client from `CoinbaseSettings`.
    pub fn new(settings: &CoinbaseSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            // Coinbase rejects requests without a user agent.
            .user_agent(concat!("ema-backtest/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(CoinbaseClient {
            http_client,
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinbaseClient {
    fn name(&self) -> &'static str {
        "Coinbase"
    }

    /// Fetches the most recent candles for `market`.
    ///
    /// This corresponds to the `GET /products/{market}/candles` endpoint. A
    /// single page is requested; Coinbase answers newest candle first.
    async fn get_candles(&self, market: &Market, granularity: Granularity) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/products/{}/candles?granularity={}",
            self.base_url, market.0, granularity.0
        );
        tracing::debug!(%url, "Requesting candles.");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        let bars = parse_candles(&body)?;
        tracing::info!(%market, %granularity, count = bars.len(), "Received candles.");
        Ok(bars)
    }
}

/// Decodes a candles response body into bars, keeping the response order.
pub fn parse_candles(body: &str) -> Result<Vec<Bar>> {
    let raw_candles: Vec<RawCandle> = serde_json::from_str(body)?;

    raw_candles
        .into_iter()
        .enumerate()
        .map(|(row, raw)| {
            let timestamp = Utc
                .timestamp_opt(raw.0, 0)
                .single()
                .ok_or_else(|| Error::InvalidCandle {
                    row,
                    reason: format!("timestamp {} is out of range", raw.0),
                })?;
            Ok(Bar {
                timestamp,
                low: to_decimal(row, &raw.1)?,
                high: to_decimal(row, &raw.2)?,
                open: to_decimal(row, &raw.3)?,
                close: to_decimal(row, &raw.4)?,
                volume: to_decimal(row, &raw.5)?,
            })
        })
        .collect()
}

fn to_decimal(row: usize, number: &Number) -> Result<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| Error::InvalidCandle {
            row,
            reason: format!("{text} is not a decimal: {e}"),
        })
}

fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string());
    Error::ApiError { status, message }
}
