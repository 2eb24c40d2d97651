// In crates/strategies/src/decision.rs

use std::fmt;

use core_types::{Candle, IndicatorKey, Signal};

use crate::indicator_gate::IndicatorGate;
use crate::indicators::attach_indicators;
use crate::sentiment_gate::SentimentGate;
use crate::types::{IndicatorSettings, RequiredIndicators, SignalSettings};
use crate::{Error, Result, Strategy};

/// The crossover check compares the latest candle with the one before it.
pub const MIN_CANDLES: usize = 2;

/// The outcome of the data checks that run before any gate is evaluated.
///
/// The checks run in declaration order and the first failure wins.
#[derive(Debug, Clone, PartialEq)]
pub enum DataCheck {
    /// Fewer than [`MIN_CANDLES`] candles.
    InsufficientData { len: usize },
    /// The latest candle has no column at all for these indicators.
    MissingIndicators(Vec<IndicatorKey>),
    /// The latest candle has these indicators undefined or NaN.
    InvalidLatestValues(Vec<IndicatorKey>),
    Ready,
}

impl DataCheck {
    pub fn is_ready(&self) -> bool {
        matches!(self, DataCheck::Ready)
    }
}

impl fmt::Display for DataCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(keys: &[IndicatorKey]) -> String {
            keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        }
        match self {
            DataCheck::InsufficientData { len } => {
                write!(f, "insufficient data: {len} candle(s), need at least {MIN_CANDLES}")
            }
            DataCheck::MissingIndicators(keys) => write!(f, "missing indicator columns: {}", join(keys)),
            DataCheck::InvalidLatestValues(keys) => {
                write!(f, "undefined values on latest candle: {}", join(keys))
            }
            DataCheck::Ready => f.write_str("ready"),
        }
    }
}

/// Combines the RSI/MACD indicator gate with the news sentiment gate.
///
/// - Buy: RSI oversold AND MACD crosses above its signal AND sentiment bullish.
/// - Sell: RSI overbought AND MACD crosses below its signal AND sentiment bearish.
/// - Hold: anything else, including every data gap.
///
/// The engine holds configuration only. Each call is a pure function of the
/// last two candles and the sentiment score.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    indicators: IndicatorSettings,
    required: RequiredIndicators,
    indicator_gate: IndicatorGate,
    sentiment_gate: SentimentGate,
}

impl SignalEngine {
    pub fn new(settings: &SignalSettings) -> Result<Self> {
        settings.validate()?;
        let required = RequiredIndicators::from_settings(&settings.indicators);
        Ok(Self {
            indicators: settings.indicators.clone(),
            required,
            indicator_gate: IndicatorGate::new(&settings.thresholds, required),
            sentiment_gate: SentimentGate::new(&settings.thresholds),
        })
    }

    /// Runs the sufficiency, schema and data-quality checks on `series`.
    pub fn check_data(&self, series: &[Candle]) -> DataCheck {
        let Some(latest) = series.last().filter(|_| series.len() >= MIN_CANDLES) else {
            return DataCheck::InsufficientData { len: series.len() };
        };

        let keys = self.required.keys();

        let missing: Vec<IndicatorKey> = keys.iter().filter(|k| !latest.has_indicator(k)).copied().collect();
        if !missing.is_empty() {
            return DataCheck::MissingIndicators(missing);
        }

        // Only the latest candle is checked; undefined values on the previous
        // candle simply fail the crossover comparison.
        let invalid: Vec<IndicatorKey> = keys.iter().filter(|k| latest.indicator(k).is_none()).copied().collect();
        if !invalid.is_empty() {
            return DataCheck::InvalidLatestValues(invalid);
        }

        DataCheck::Ready
    }

    /// Decides the trading action for the most recent candle.
    ///
    /// Data gaps resolve to `Hold`. A NaN sentiment score is a caller bug and
    /// is reported as [`Error::InvalidInput`].
    pub fn decide(&self, series: &[Candle], sentiment: f64) -> Result<Signal> {
        if !self.check_data(series).is_ready() {
            return Ok(Signal::Hold);
        }
        if sentiment.is_nan() {
            return Err(Error::InvalidInput("sentiment score is NaN".to_string()));
        }

        let [.., previous, latest] = series else {
            return Ok(Signal::Hold);
        };

        let buy_ready = self.indicator_gate.rsi_oversold(latest)
            && self.indicator_gate.macd_cross_above(previous, latest)
            && self.sentiment_gate.is_bullish(sentiment);

        let sell_ready = self.indicator_gate.rsi_overbought(latest)
            && self.indicator_gate.macd_cross_below(previous, latest)
            && self.sentiment_gate.is_bearish(sentiment);

        let signal = if buy_ready {
            Signal::Buy
        } else if sell_ready {
            Signal::Sell
        } else {
            Signal::Hold
        };

        Ok(signal)
    }
}

impl Strategy for SignalEngine {
    fn name(&self) -> &'static str {
        "SentimentRsiMacd"
    }

    fn prepare(&self, candles: &mut [Candle]) -> Result<()> {
        attach_indicators(candles, &self.indicators)
    }

    fn check_data(&self, candles: &[Candle]) -> DataCheck {
        SignalEngine::check_data(self, candles)
    }

    fn assess(&self, candles: &[Candle], sentiment: f64) -> Result<Signal> {
        self.decide(candles, sentiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn engine() -> SignalEngine {
        SignalEngine::new(&SignalSettings::default()).unwrap()
    }

    /// Builds a series from `(rsi, macd, signal)` rows, oldest first.
    fn series(rows: &[(Option<f64>, Option<f64>, Option<f64>)]) -> Vec<Candle> {
        let required = RequiredIndicators::default();
        rows.iter()
            .enumerate()
            .map(|(i, (rsi, macd, signal))| {
                let open_time = i as i64 * 3_600_000;
                Candle::new(open_time, dec!(100), dec!(101), dec!(99), dec!(100), dec!(5), open_time + 3_599_999)
                    .with_indicator(required.rsi, *rsi)
                    .with_indicator(required.macd_line, *macd)
                    .with_indicator(required.macd_signal, *signal)
            })
            .collect()
    }

    fn buy_technicals() -> Vec<Candle> {
        series(&[(Some(40.0), Some(-0.5), Some(0.0)), (Some(25.0), Some(0.5), Some(0.0))])
    }

    fn sell_technicals() -> Vec<Candle> {
        series(&[(Some(60.0), Some(0.5), Some(0.0)), (Some(75.0), Some(-0.5), Some(0.0))])
    }

    #[test]
    fn buy_when_all_three_buy_conditions_agree() {
        assert_eq!(engine().decide(&buy_technicals(), 0.5), Ok(Signal::Buy));
    }

    #[test]
    fn hold_when_sentiment_is_not_bullish_enough() {
        let engine = engine();
        assert_eq!(engine.decide(&buy_technicals(), 0.1), Ok(Signal::Hold));
        assert_eq!(engine.decide(&buy_technicals(), -0.5), Ok(Signal::Hold));
    }

    #[test]
    fn sell_when_all_three_sell_conditions_agree() {
        assert_eq!(engine().decide(&sell_technicals(), -0.6), Ok(Signal::Sell));
    }

    #[test]
    fn hold_when_sentiment_is_not_bearish_enough() {
        let engine = engine();
        assert_eq!(engine.decide(&sell_technicals(), -0.1), Ok(Signal::Hold));
        assert_eq!(engine.decide(&sell_technicals(), 0.5), Ok(Signal::Hold));
    }

    #[test]
    fn hold_without_macd_crossover() {
        let candles = series(&[(Some(40.0), Some(0.1), Some(0.0)), (Some(25.0), Some(0.5), Some(0.0))]);
        assert_eq!(engine().decide(&candles, 0.8), Ok(Signal::Hold));
    }

    #[test]
    fn hold_when_rsi_is_not_oversold() {
        let candles = series(&[(Some(40.0), Some(-0.5), Some(0.0)), (Some(45.0), Some(0.5), Some(0.0))]);
        assert_eq!(engine().decide(&candles, 0.8), Ok(Signal::Hold));
    }

    #[test]
    fn hold_on_single_candle_or_empty_series() {
        let engine = engine();
        let one = &buy_technicals()[1..];
        assert_eq!(engine.check_data(one), DataCheck::InsufficientData { len: 1 });
        assert_eq!(engine.decide(one, 0.8), Ok(Signal::Hold));
        assert_eq!(engine.decide(&[], 0.8), Ok(Signal::Hold));
    }

    #[test]
    fn hold_when_required_columns_are_missing() {
        let engine = engine();
        let required = RequiredIndicators::default();
        let candles: Vec<Candle> = [40.0, 25.0]
            .iter()
            .enumerate()
            .map(|(i, rsi)| {
                Candle::new(i as i64, dec!(1), dec!(1), dec!(1), dec!(1), dec!(1), i as i64)
                    .with_indicator(required.rsi, Some(*rsi))
            })
            .collect();

        assert_eq!(
            engine.check_data(&candles),
            DataCheck::MissingIndicators(vec![required.macd_line, required.macd_signal])
        );
        assert_eq!(engine.decide(&candles, 0.8), Ok(Signal::Hold));
    }

    #[test]
    fn hold_when_latest_rsi_is_undefined() {
        let engine = engine();
        let required = RequiredIndicators::default();
        for latest_rsi in [None, Some(f64::NAN)] {
            let candles = series(&[(Some(40.0), Some(-0.5), Some(0.0)), (latest_rsi, Some(0.5), Some(0.0))]);
            assert_eq!(engine.check_data(&candles), DataCheck::InvalidLatestValues(vec![required.rsi]));
            assert_eq!(engine.decide(&candles, 0.8), Ok(Signal::Hold));
        }
    }

    #[test]
    fn undefined_previous_macd_is_not_checked_but_cannot_cross() {
        let engine = engine();
        let candles = series(&[(Some(40.0), None, None), (Some(25.0), Some(0.5), Some(0.0))]);
        assert!(engine.check_data(&candles).is_ready());
        assert_eq!(engine.decide(&candles, 0.8), Ok(Signal::Hold));
    }

    #[test]
    fn only_the_last_two_candles_matter() {
        let engine = engine();
        let mut candles = series(&[(None, None, None), (Some(99.0), Some(7.0), Some(-3.0))]);
        candles.extend(buy_technicals().into_iter().map(|mut c| {
            c.open_time += 10 * 3_600_000;
            c
        }));
        assert_eq!(engine.decide(&candles, 0.5), Ok(Signal::Buy));
    }

    #[test]
    fn nan_sentiment_is_invalid_input_once_data_is_ready() {
        let engine = engine();
        assert!(matches!(engine.decide(&buy_technicals(), f64::NAN), Err(Error::InvalidInput(_))));
        assert_eq!(engine.decide(&buy_technicals()[..1], f64::NAN), Ok(Signal::Hold));
    }

    #[test]
    fn exact_threshold_values_hold() {
        let engine = engine();
        let rsi_at_threshold = series(&[(Some(40.0), Some(-0.5), Some(0.0)), (Some(30.0), Some(0.5), Some(0.0))]);
        assert_eq!(engine.decide(&rsi_at_threshold, 0.5), Ok(Signal::Hold));
        assert_eq!(engine.decide(&buy_technicals(), 0.2), Ok(Signal::Hold));
        assert_eq!(engine.decide(&sell_technicals(), -0.2), Ok(Signal::Hold));
        let macd_touch = series(&[(Some(40.0), Some(0.0), Some(0.0)), (Some(25.0), Some(0.5), Some(0.0))]);
        assert_eq!(engine.decide(&macd_touch, 0.5), Ok(Signal::Hold));
    }

    #[test]
    fn custom_thresholds_shift_the_gates() {
        let mut settings = SignalSettings::default();
        settings.thresholds.rsi_oversold = 20.0;
        let strict = SignalEngine::new(&settings).unwrap();
        assert_eq!(strict.decide(&buy_technicals(), 0.5), Ok(Signal::Hold));

        settings.thresholds.rsi_oversold = 30.0;
        settings.thresholds.sentiment_bullish = 0.05;
        let lenient = SignalEngine::new(&settings).unwrap();
        assert_eq!(lenient.decide(&buy_technicals(), 0.1), Ok(Signal::Buy));
    }

    #[test]
    fn invalid_settings_fail_construction() {
        let mut settings = SignalSettings::default();
        settings.thresholds.rsi_overbought = 10.0;
        assert!(matches!(SignalEngine::new(&settings), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn data_check_messages_name_the_columns() {
        let required = RequiredIndicators::default();
        let check = DataCheck::InvalidLatestValues(vec![required.rsi, required.macd_signal]);
        assert_eq!(check.to_string(), "undefined values on latest candle: RSI_14, MACDs_12_26_9");
    }
}
