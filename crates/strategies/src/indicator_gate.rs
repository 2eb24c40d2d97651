// In crates/strategies/src/indicator_gate.rs

use core_types::Candle;

use crate::types::{GateThresholds, RequiredIndicators};

/// Technical predicates over the latest and the immediately preceding candle.
///
/// Every predicate is false when one of its operands is missing, undefined or
/// NaN; none of them can fail.
#[derive(Debug, Clone)]
pub struct IndicatorGate {
    rsi_oversold: f64,
    rsi_overbought: f64,
    required: RequiredIndicators,
}

impl IndicatorGate {
    pub fn new(thresholds: &GateThresholds, required: RequiredIndicators) -> Self {
        Self {
            rsi_oversold: thresholds.rsi_oversold,
            rsi_overbought: thresholds.rsi_overbought,
            required,
        }
    }

    /// Latest RSI strictly below the oversold threshold.
    pub fn rsi_oversold(&self, latest: &Candle) -> bool {
        latest
            .indicator(&self.required.rsi)
            .is_some_and(|rsi| rsi < self.rsi_oversold)
    }

    /// Latest RSI strictly above the overbought threshold.
    pub fn rsi_overbought(&self, latest: &Candle) -> bool {
        latest
            .indicator(&self.required.rsi)
            .is_some_and(|rsi| rsi > self.rsi_overbought)
    }

    /// The MACD line was below its signal line and is now above it.
    pub fn macd_cross_above(&self, previous: &Candle, latest: &Candle) -> bool {
        match (self.macd_pair(previous), self.macd_pair(latest)) {
            (Some((prev_macd, prev_signal)), Some((macd, signal))) => {
                prev_macd < prev_signal && macd > signal
            }
            _ => false,
        }
    }

    /// The MACD line was above its signal line and is now below it.
    pub fn macd_cross_below(&self, previous: &Candle, latest: &Candle) -> bool {
        match (self.macd_pair(previous), self.macd_pair(latest)) {
            (Some((prev_macd, prev_signal)), Some((macd, signal))) => {
                prev_macd > prev_signal && macd < signal
            }
            _ => false,
        }
    }

    fn macd_pair(&self, candle: &Candle) -> Option<(f64, f64)> {
        Some((
            candle.indicator(&self.required.macd_line)?,
            candle.indicator(&self.required.macd_signal)?,
        ))
    }
}
