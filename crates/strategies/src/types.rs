// In crates/strategies/src/types.rs

use core_types::IndicatorKey;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Thresholds for the indicator and sentiment gates.
///
/// All comparisons against these values are strict.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GateThresholds {
    /// RSI below this value counts as oversold.
    pub rsi_oversold: f64,
    /// RSI above this value counts as overbought.
    pub rsi_overbought: f64,
    /// Sentiment above this value counts as bullish.
    pub sentiment_bullish: f64,
    /// Sentiment below this value counts as bearish.
    pub sentiment_bearish: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            sentiment_bullish: 0.2,
            sentiment_bearish: -0.2,
        }
    }
}

impl GateThresholds {
    pub fn validate(&self) -> Result<()> {
        let all = [
            ("rsi_oversold", self.rsi_oversold),
            ("rsi_overbought", self.rsi_overbought),
            ("sentiment_bullish", self.sentiment_bullish),
            ("sentiment_bearish", self.sentiment_bearish),
        ];
        if let Some((name, value)) = all.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidParameters(format!("{name} must be finite, got {value}")));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(Error::InvalidParameters(format!(
                "rsi_oversold ({}) must be below rsi_overbought ({})",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        if self.sentiment_bearish >= self.sentiment_bullish {
            return Err(Error::InvalidParameters(format!(
                "sentiment_bearish ({}) must be below sentiment_bullish ({})",
                self.sentiment_bearish, self.sentiment_bullish
            )));
        }
        Ok(())
    }
}

/// Lookback parameters for the indicators attached to each candle.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IndicatorSettings {
    pub rsi_period: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub bband_period: u32,
    pub bband_stddev: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bband_period: 20,
            bband_stddev: 2.0,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bband_period", self.bband_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(Error::InvalidParameters(format!("{name} must be greater than 0")));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(Error::InvalidParameters(format!(
                "macd_fast ({}) must be below macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if !self.bband_stddev.is_finite() || self.bband_stddev <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "bband_stddev must be positive, got {}",
                self.bband_stddev
            )));
        }
        Ok(())
    }

    pub fn rsi_key(&self) -> IndicatorKey {
        IndicatorKey::Rsi { length: self.rsi_period }
    }

    pub fn macd_line_key(&self) -> IndicatorKey {
        IndicatorKey::MacdLine { fast: self.macd_fast, slow: self.macd_slow, signal: self.macd_signal }
    }

    pub fn macd_signal_key(&self) -> IndicatorKey {
        IndicatorKey::MacdSignal { fast: self.macd_fast, slow: self.macd_slow, signal: self.macd_signal }
    }

    pub fn macd_histogram_key(&self) -> IndicatorKey {
        IndicatorKey::MacdHistogram { fast: self.macd_fast, slow: self.macd_slow, signal: self.macd_signal }
    }

    /// Lower, middle and upper band keys, in that order.
    pub fn bollinger_keys(&self) -> [IndicatorKey; 3] {
        let length = self.bband_period;
        [
            IndicatorKey::BollingerLower { length },
            IndicatorKey::BollingerMiddle { length },
            IndicatorKey::BollingerUpper { length },
        ]
    }
}

/// Everything the signal engine is configured with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SignalSettings {
    pub thresholds: GateThresholds,
    pub indicators: IndicatorSettings,
}

impl SignalSettings {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.indicators.validate()
    }
}

/// The indicator columns the decision engine reads from the last two candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredIndicators {
    pub rsi: IndicatorKey,
    pub macd_line: IndicatorKey,
    pub macd_signal: IndicatorKey,
}

impl RequiredIndicators {
    pub fn from_settings(settings: &IndicatorSettings) -> Self {
        Self {
            rsi: settings.rsi_key(),
            macd_line: settings.macd_line_key(),
            macd_signal: settings.macd_signal_key(),
        }
    }

    pub fn keys(&self) -> [IndicatorKey; 3] {
        [self.rsi, self.macd_line, self.macd_signal]
    }
}

impl Default for RequiredIndicators {
    fn default() -> Self {
        Self::from_settings(&IndicatorSettings::default())
    }
}
