// In crates/api-client/src/lib.rs

use std::time::Duration;

use async_trait::async_trait;
use core_types::{Candle, Symbol};

pub mod binance;
pub mod error;
pub mod kucoin;
pub mod news;
pub mod sentiment;
pub mod telegram;
pub mod types;

// Re-export public types
pub use binance::BinanceClient;
pub use error::{Error, Result};
pub use kucoin::KucoinClient;
pub use news::NewsApiClient;
pub use sentiment::FinbertScorer;
pub use telegram::TelegramNotifier;

/// A source of recent OHLCV candles.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetches the `limit` most recent candles for `symbol`, oldest first.
    async fn fetch_candles(&self, symbol: &Symbol, interval: &str, limit: u32) -> Result<Vec<Candle>>;
}

/// A source of recent news headlines.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn fetch_headlines(&self, query: &str) -> Result<Vec<String>>;
}

/// Turns a batch of headlines into one aggregate score.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Returns a score nominally in [-1, 1]; an empty batch scores 0.0.
    async fn score(&self, headlines: &[String]) -> Result<f64>;
}

/// Somewhere to deliver a formatted alert.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Builds the HTTP client every service client shares.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("signal-bot/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| Error::ClientBuildError(e.to_string()))
}
