// In crates/api-client/src/types.rs

use reqwest::Client;
use serde::Deserialize;
use serde_json::Number;

/// The client for the public Coinbase Exchange market-data endpoints.
#[derive(Debug, Clone)]
pub struct CoinbaseClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The base URL for the Coinbase Exchange REST API.
    pub base_url: String,
}

/// One row of the candles response, which is a JSON array of numbers:
/// `[time, low, high, open, close, volume]`, newest row first.
#[derive(Debug, Deserialize)]
pub struct RawCandle(
    pub i64,    // 0: Bucket start time (epoch seconds)
    pub Number, // 1: Low
    pub Number, // 2: High
    pub Number, // 3: Open
    pub Number, // 4: Close
    pub Number, // 5: Volume
);

/// The error body Coinbase sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}
