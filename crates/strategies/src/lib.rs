// In crates/strategies/src/lib.rs

use core_types::{Candle, Signal};

pub mod decision;
pub mod error;
pub mod indicator_gate;
pub mod indicators;
pub mod sentiment_gate;
pub mod types;

pub use decision::{DataCheck, MIN_CANDLES, SignalEngine};
pub use error::{Error, Result};
pub use indicator_gate::IndicatorGate;
pub use indicators::attach_indicators;
pub use sentiment_gate::SentimentGate;
pub use types::{GateThresholds, IndicatorSettings, RequiredIndicators, SignalSettings};

/// The interface the signal task drives once per cycle.
///
/// A strategy attaches the indicator columns it needs to a freshly fetched
/// series, then turns that series plus a sentiment score into a `Signal`.
/// Implementations hold configuration only; every call is independent of the
/// calls before it.
pub trait Strategy: Send + Sync {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Attaches the strategy's indicator columns to `candles` in place.
    fn prepare(&self, candles: &mut [Candle]) -> Result<()>;

    /// Reports whether `candles` can support a decision.
    fn check_data(&self, candles: &[Candle]) -> DataCheck;

    fn assess(&self, candles: &[Candle], sentiment: f64) -> Result<Signal>;
}
