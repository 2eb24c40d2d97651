// In crates/strategies/src/indicators.rs

use core_types::Candle;
use num_traits::cast::ToPrimitive;
use ta::Next;
use ta::indicators::{
    BollingerBands, MovingAverageConvergenceDivergence as Macd, RelativeStrengthIndex as Rsi,
};

use crate::types::IndicatorSettings;
use crate::{Error, Result};

/// Computes RSI, MACD and Bollinger bands over the closing prices and attaches
/// every column to every candle.
///
/// Values inside an indicator's warm-up window are attached as `None`, so the
/// column is present on all candles but undefined until its lookback is met:
/// - RSI: undefined before index `rsi_period`.
/// - MACD line: undefined before index `macd_slow - 1`.
/// - MACD signal/histogram: undefined before index `macd_slow + macd_signal - 2`.
/// - Bollinger bands: undefined before index `bband_period - 1`.
pub fn attach_indicators(candles: &mut [Candle], settings: &IndicatorSettings) -> Result<()> {
    settings.validate()?;

    let rsi_period = settings.rsi_period as usize;
    let macd_slow = settings.macd_slow as usize;
    let macd_signal = settings.macd_signal as usize;
    let bband_period = settings.bband_period as usize;

    let mut rsi = Rsi::new(rsi_period).map_err(invalid_parameters)?;
    let mut macd = Macd::new(settings.macd_fast as usize, macd_slow, macd_signal).map_err(invalid_parameters)?;
    let mut bbands = BollingerBands::new(bband_period, settings.bband_stddev).map_err(invalid_parameters)?;

    let rsi_key = settings.rsi_key();
    let macd_line_key = settings.macd_line_key();
    let macd_signal_key = settings.macd_signal_key();
    let macd_histogram_key = settings.macd_histogram_key();
    let [bbl_key, bbm_key, bbu_key] = settings.bollinger_keys();

    let macd_line_ready = macd_slow - 1;
    let macd_signal_ready = macd_slow + macd_signal - 2;
    let bbands_ready = bband_period - 1;

    for (i, candle) in candles.iter_mut().enumerate() {
        let close = candle.close.to_f64().ok_or_else(|| {
            Error::InvalidInput(format!("close {} at open_time {} is not representable as f64", candle.close, candle.open_time))
        })?;

        let rsi_value = rsi.next(close);
        let macd_value = macd.next(close);
        let bbands_value = bbands.next(close);

        candle.set_indicator(rsi_key, (i >= rsi_period).then_some(rsi_value));
        candle.set_indicator(macd_line_key, (i >= macd_line_ready).then_some(macd_value.macd));
        candle.set_indicator(macd_signal_key, (i >= macd_signal_ready).then_some(macd_value.signal));
        candle.set_indicator(macd_histogram_key, (i >= macd_signal_ready).then_some(macd_value.histogram));
        candle.set_indicator(bbl_key, (i >= bbands_ready).then_some(bbands_value.lower));
        candle.set_indicator(bbm_key, (i >= bbands_ready).then_some(bbands_value.average));
        candle.set_indicator(bbu_key, (i >= bbands_ready).then_some(bbands_value.upper));
    }

    Ok(())
}

fn invalid_parameters(err: ta::errors::TaError) -> Error {
    Error::InvalidParameters(format!("{err:?}"))
}
