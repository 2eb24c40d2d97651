// In crates/core-types/src/types.rs

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A trading pair in `BASE/QUOTE` notation (e.g. "BTC/USDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    /// Parses a `BASE/QUOTE` pair, normalising it to upper case.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_uppercase();
        match normalized.split_once('/') {
            Some((base, quote))
                if !base.is_empty()
                    && !quote.is_empty()
                    && !quote.contains('/')
                    && normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '/') =>
            {
                Ok(Self(normalized))
            }
            _ => Err(Error::InvalidSymbol(raw.to_string())),
        }
    }

    /// The pair as exchanges expect it in REST paths and query strings ("BTCUSDT").
    pub fn exchange_code(&self) -> String {
        self.0.replace('/', "")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name of an indicator column attached to a candle, including the
/// parameters it was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorKey {
    Rsi { length: u32 },
    MacdLine { fast: u32, slow: u32, signal: u32 },
    MacdSignal { fast: u32, slow: u32, signal: u32 },
    MacdHistogram { fast: u32, slow: u32, signal: u32 },
    BollingerLower { length: u32 },
    BollingerMiddle { length: u32 },
    BollingerUpper { length: u32 },
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKey::Rsi { length } => write!(f, "RSI_{length}"),
            IndicatorKey::MacdLine { fast, slow, signal } => write!(f, "MACD_{fast}_{slow}_{signal}"),
            IndicatorKey::MacdSignal { fast, slow, signal } => write!(f, "MACDs_{fast}_{slow}_{signal}"),
            IndicatorKey::MacdHistogram { fast, slow, signal } => write!(f, "MACDh_{fast}_{slow}_{signal}"),
            IndicatorKey::BollingerLower { length } => write!(f, "BBL_{length}"),
            IndicatorKey::BollingerMiddle { length } => write!(f, "BBM_{length}"),
            IndicatorKey::BollingerUpper { length } => write!(f, "BBU_{length}"),
        }
    }
}

/// A single OHLCV candle with the indicator columns attached to it.
///
/// A key present in `indicators` with a `None` value means the column exists
/// but the indicator's lookback window was not yet satisfied for this candle.
/// A key that is absent means the column was never attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// Open time in epoch milliseconds.
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    /// Close time in epoch milliseconds.
    pub close_time: i64,
    pub indicators: BTreeMap<IndicatorKey, Option<f64>>,
}

impl Candle {
    /// Creates a candle with no indicator columns attached.
    pub fn new(
        open_time: i64,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
        close_time: i64,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            close_time,
            indicators: BTreeMap::new(),
        }
    }

    /// The candle's open time as a UTC timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.open_time).single()
    }

    pub fn has_indicator(&self, key: &IndicatorKey) -> bool {
        self.indicators.contains_key(key)
    }

    /// The indicator's value, or `None` if the column is absent, undefined or NaN.
    pub fn indicator(&self, key: &IndicatorKey) -> Option<f64> {
        self.indicators
            .get(key)
            .copied()
            .flatten()
            .filter(|v| !v.is_nan())
    }

    pub fn set_indicator(&mut self, key: IndicatorKey, value: Option<f64>) {
        self.indicators.insert(key, value);
    }

    /// Builder-style variant of [`Candle::set_indicator`].
    pub fn with_indicator(mut self, key: IndicatorKey, value: Option<f64>) -> Self {
        self.set_indicator(key, value);
        self
    }
}

/// The trading action produced by a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Whether this signal warrants an alert.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Hold)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        };
        f.write_str(label)
    }
}
