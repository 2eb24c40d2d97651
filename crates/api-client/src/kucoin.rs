// In crates/api-client/src/kucoin.rs

use app_config::KucoinSettings;
use async_trait::async_trait;
use core_types::{Candle, Symbol};
use rust_decimal::Decimal;

use crate::types::{KucoinResponse, RawKucoinCandle};
use crate::{CandleSource, Error, Result};

const SUCCESS_CODE: &str = "200000";

/// Maps a Binance-style interval ("1h") to KuCoin's candle type ("1hour")
/// and the candle length in seconds.
pub fn candle_type(interval: &str) -> Option<(&'static str, i64)> {
    let mapped = match interval {
        "1m" => ("1min", 60),
        "3m" => ("3min", 180),
        "5m" => ("5min", 300),
        "15m" => ("15min", 900),
        "30m" => ("30min", 1_800),
        "1h" => ("1hour", 3_600),
        "2h" => ("2hour", 7_200),
        "4h" => ("4hour", 14_400),
        "6h" => ("6hour", 21_600),
        "8h" => ("8hour", 28_800),
        "12h" => ("12hour", 43_200),
        "1d" => ("1day", 86_400),
        "1w" => ("1week", 604_800),
        _ => return None,
    };
    Some(mapped)
}

/// Public market-data client for the KuCoin spot REST API.
#[derive(Debug, Clone)]
pub struct KucoinClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl KucoinClient {
    pub fn new(http_client: reqwest::Client, settings: &KucoinSettings) -> Self {
        Self {
            http_client,
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches candles from `GET /api/v1/market/candles`.
    ///
    /// KuCoin has no limit parameter and answers newest first, so the most
    /// recent `limit` rows are kept and put in chronological order.
    pub async fn get_candles(&self, symbol: &Symbol, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let (kind, interval_secs) =
            candle_type(interval).ok_or_else(|| Error::UnsupportedInterval(interval.to_string()))?;
        let url = format!("{}/api/v1/market/candles", self.base_url);
        let pair = symbol.0.replace('/', "-");

        let response_body = self
            .http_client
            .get(&url)
            .query(&[("type", kind), ("symbol", pair.as_str())])
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        parse_candles(&response_body, interval_secs, limit as usize)
    }
}

#[async_trait]
impl CandleSource for KucoinClient {
    async fn fetch_candles(&self, symbol: &Symbol, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let candles = self.get_candles(symbol, interval, limit).await?;
        tracing::debug!(%symbol, interval, count = candles.len(), "Fetched KuCoin candles.");
        Ok(candles)
    }
}

/// Parses a `/api/v1/market/candles` body into at most `limit` candles,
/// oldest first.
pub fn parse_candles(body: &str, interval_secs: i64, limit: usize) -> Result<Vec<Candle>> {
    let response: KucoinResponse<Vec<RawKucoinCandle>> = serde_json::from_str(body)?;
    if response.code != SUCCESS_CODE {
        return Err(Error::ApiError {
            code: response.code.parse().unwrap_or_default(),
            msg: response.msg.unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let mut candles = response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|raw| to_candle(raw, interval_secs))
        .collect::<Result<Vec<_>>>()?;

    candles.sort_by_key(|c| c.open_time);
    let excess = candles.len().saturating_sub(limit);
    candles.drain(..excess);
    Ok(candles)
}

fn to_candle(raw: RawKucoinCandle, interval_secs: i64) -> Result<Candle> {
    let start: i64 = raw
        .0
        .parse()
        .map_err(|_| Error::MalformedResponse(format!("candle start '{}' is not a timestamp", raw.0)))?;
    let field = |name: &str, value: &str| -> Result<Decimal> {
        value
            .parse()
            .map_err(|_| Error::MalformedResponse(format!("candle {start}: {name} '{value}' is not a decimal")))
    };

    let open_time = start * 1000;
    Ok(Candle::new(
        open_time,
        field("open", &raw.1)?,
        field("high", &raw.3)?,
        field("low", &raw.4)?,
        field("close", &raw.2)?,
        field("volume", &raw.5)?,
        open_time + interval_secs * 1000 - 1,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // Newest first, as KuCoin sends them.
    const CANDLES: &str = r#"{
        "code": "200000",
        "data": [
            ["1700007200", "37390.99", "37500.00", "37600.00", "37300.00", "98.1", "3670000.0"],
            ["1700003600", "37100.00", "37390.99", "37400.00", "37050.00", "640.0", "23900000.4"],
            ["1700000000", "37000.10", "37100.00", "37250.00", "36900.50", "812.345", "30100000.1"]
        ]
    }"#;

    #[test]
    fn parses_candles_oldest_first() {
        let candles = parse_candles(CANDLES, 3_600, 10).unwrap();
        assert_eq!(candles.len(), 3);

        let first = &candles[0];
        assert_eq!(first.open_time, 1_700_000_000_000);
        assert_eq!(first.close_time, 1_700_003_599_999);
        assert_eq!(first.open, dec!(37000.10));
        assert_eq!(first.high, dec!(37250.00));
        assert_eq!(first.low, dec!(36900.50));
        assert_eq!(first.close, dec!(37100.00));
        assert_eq!(first.volume, dec!(812.345));
        assert_eq!(candles[2].close, dec!(37500.00));
    }

    #[test]
    fn keeps_only_the_most_recent_limit() {
        let candles = parse_candles(CANDLES, 3_600, 2).unwrap();
        let opens: Vec<i64> = candles.iter().map(|c| c.open_time).collect();
        assert_eq!(opens, vec![1_700_003_600_000, 1_700_007_200_000]);
    }

    #[test]
    fn kucoin_error_code_becomes_api_error() {
        let body = r#"{"code": "400100", "msg": "This pair is not provided at present"}"#;
        match parse_candles(body, 3_600, 10) {
            Err(Error::ApiError { code, msg }) => {
                assert_eq!(code, 400_100);
                assert_eq!(msg, "This pair is not provided at present");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn empty_data_is_no_candles() {
        assert!(parse_candles(r#"{"code": "200000", "data": []}"#, 60, 10).unwrap().is_empty());
        assert!(parse_candles(r#"{"code": "200000"}"#, 60, 10).unwrap().is_empty());
    }

    #[test]
    fn bad_rows_are_rejected() {
        let bad_price = r#"{"code": "200000", "data": [["1", "abc", "1", "1", "1", "1", "1"]]}"#;
        assert!(matches!(parse_candles(bad_price, 60, 10), Err(Error::MalformedResponse(_))));

        let bad_time = r#"{"code": "200000", "data": [["soon", "1", "1", "1", "1", "1", "1"]]}"#;
        assert!(matches!(parse_candles(bad_time, 60, 10), Err(Error::MalformedResponse(_))));

        assert!(matches!(parse_candles("<html>", 60, 10), Err(Error::DeserializationFailed(_))));
    }

    #[test]
    fn intervals_map_to_kucoin_types() {
        assert_eq!(candle_type("1m"), Some(("1min", 60)));
        assert_eq!(candle_type("1h"), Some(("1hour", 3_600)));
        assert_eq!(candle_type("1d"), Some(("1day", 86_400)));
        assert_eq!(candle_type("3d"), None);
        assert_eq!(candle_type("1M"), None);
    }
}
