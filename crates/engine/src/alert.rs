// In crates/engine/src/alert.rs

use std::fmt;

use core_types::{Signal, Symbol};
use rust_decimal::{Decimal, RoundingStrategy};

/// The human-readable message sent when the engine produces a BUY or SELL.
#[derive(Debug, Clone)]
pub struct SignalAlert<'a> {
    pub symbol: &'a Symbol,
    pub signal: Signal,
    /// Close of the most recent candle.
    pub price: Decimal,
    pub sentiment: f64,
    pub timeframe: &'a str,
}

impl fmt::Display for SignalAlert<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🚨 Trading Signal Alert 🚨")?;
        writeln!(f)?;
        writeln!(f, "Symbol: {}", self.symbol)?;
        writeln!(f, "Signal: {}", self.signal)?;
        writeln!(f, "Price: {}", format_usd(self.price))?;
        writeln!(f, "Sentiment Score: {:.3}", self.sentiment)?;
        write!(f, "Timeframe: {}", self.timeframe)
    }
}

/// Formats a price as dollars with thousands separators and two decimals
/// (`$37,390.99`).
pub fn format_usd(price: Decimal) -> String {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = rounded.abs().to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("${sign}{}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
