// In crates/strategies/src/sentiment_gate.rs

use crate::types::GateThresholds;

/// Classifies a news sentiment score against the bullish and bearish thresholds.
#[derive(Debug, Clone, Copy)]
pub struct SentimentGate {
    bullish: f64,
    bearish: f64,
}

impl SentimentGate {
    pub fn new(thresholds: &GateThresholds) -> Self {
        Self {
            bullish: thresholds.sentiment_bullish,
            bearish: thresholds.sentiment_bearish,
        }
    }

    pub fn is_bullish(&self, score: f64) -> bool {
        score > self.bullish
    }

    pub fn is_bearish(&self, score: f64) -> bool {
        score < self.bearish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strict_and_neutral_is_neither() {
        let gate = SentimentGate::new(&GateThresholds::default());
        assert!(gate.is_bullish(0.21));
        assert!(!gate.is_bullish(0.2));
        assert!(gate.is_bearish(-0.21));
        assert!(!gate.is_bearish(-0.2));
        assert!(!gate.is_bullish(0.0) && !gate.is_bearish(0.0));
    }

    #[test]
    fn out_of_range_scores_are_taken_as_is() {
        let gate = SentimentGate::new(&GateThresholds::default());
        assert!(gate.is_bullish(3.0));
        assert!(gate.is_bearish(-7.5));
        assert!(gate.is_bullish(f64::INFINITY));
    }

    #[test]
    fn asymmetric_thresholds_are_honoured() {
        let thresholds = GateThresholds {
            sentiment_bullish: 0.5,
            sentiment_bearish: -0.1,
            ..Default::default()
        };
        let gate = SentimentGate::new(&thresholds);
        assert!(!gate.is_bullish(0.4));
        assert!(gate.is_bearish(-0.15));
    }
}
