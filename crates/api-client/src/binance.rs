// In crates/api-client/src/binance.rs

use app_config::BinanceSettings;
use async_trait::async_trait;
use core_types::{Candle, Symbol};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::types::RawKline;
use crate::{CandleSource, Error, Result};

/// Public market-data client for the Binance spot REST API.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(http_client: reqwest::Client, settings: &BinanceSettings) -> Self {
        Self {
            http_client,
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches historical kline (candlestick) data.
    ///
    /// This corresponds to the `GET /api/v3/klines` endpoint. The last kline
    /// returned is the one still forming.
    pub async fn get_klines(&self, symbol: &Symbol, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let symbol_code = symbol.exchange_code();
        let limit = limit.to_string();

        let response_body = self
            .http_client
            .get(&url)
            .query(&[("symbol", symbol_code.as_str()), ("interval", interval), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        parse_klines(&response_body)
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn fetch_candles(&self, symbol: &Symbol, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let candles = self.get_klines(symbol, interval, limit).await?;
        tracing::debug!(%symbol, interval, count = candles.len(), "Fetched klines.");
        Ok(candles)
    }
}

/// Parses a `/api/v3/klines` body into candles.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>> {
    let raw_klines: Vec<RawKline> = serde_json::from_str(body).map_err(|e| {
        // If deserialization fails, it might be a Binance error object.
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            if let Some(code) = value.get("code").and_then(Value::as_i64) {
                let msg = value.get("msg").and_then(Value::as_str).unwrap_or("").to_string();
                return Error::ApiError { code, msg };
            }
        }
        Error::DeserializationFailed(e)
    })?;

    raw_klines.into_iter().map(to_candle).collect()
}

fn to_candle(raw: RawKline) -> Result<Candle> {
    let open_time = raw.0;
    let field = |name: &str, value: &str| -> Result<Decimal> {
        value
            .parse()
            .map_err(|_| Error::MalformedResponse(format!("kline {open_time}: {name} '{value}' is not a decimal")))
    };

    Ok(Candle::new(
        open_time,
        field("open", &raw.1)?,
        field("high", &raw.2)?,
        field("low", &raw.3)?,
        field("close", &raw.4)?,
        field("volume", &raw.5)?,
        raw.6,
    ))
}
