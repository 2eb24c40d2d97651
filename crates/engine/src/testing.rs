// In crates/engine/src/testing.rs

//! In-memory collaborators for driving cycles in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use api_client::{AlertSink, CandleSource, HeadlineSource, SentimentScorer};
use async_trait::async_trait;
use core_types::{Candle, Signal, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strategies::{DataCheck, Strategy};

use crate::task::{Collaborators, SignalTask};

pub fn task(
    strategy: impl Strategy + 'static,
    candles: impl CandleSource + 'static,
    headlines: impl HeadlineSource + 'static,
    scorer: impl SentimentScorer + 'static,
    alerts: Option<Box<dyn AlertSink>>,
) -> SignalTask {
    SignalTask::new(
        Symbol::parse("BTC/USDT").unwrap(),
        "1h".to_string(),
        200,
        "Bitcoin".to_string(),
        Box::new(strategy),
        Collaborators {
            candles: Box::new(candles),
            headlines: Box::new(headlines),
            scorer: Box::new(scorer),
            alerts,
        },
    )
}

/// Hourly candles that all close at 37,000.
pub fn flat_candles(len: usize) -> Vec<Candle> {
    (0..len)
        .map(|i| {
            let open_time = i as i64 * 3_600_000;
            Candle::new(open_time, dec!(37000), dec!(37000), dec!(37000), dec!(37000), dec!(10), open_time + 3_599_999)
        })
        .collect()
}

/// Hourly candles whose closes step up twice then down twice around 37,000,
/// so gains and losses stay balanced.
pub fn sideways_candles(len: usize) -> Vec<Candle> {
    let steps: [Decimal; 4] = [dec!(37000), dec!(37050), dec!(37100), dec!(37050)];
    (0..len)
        .map(|i| {
            let open_time = i as i64 * 3_600_000;
            let close = steps[i % steps.len()];
            Candle::new(open_time, close, close + dec!(25), close - dec!(25), close, dec!(10), open_time + 3_599_999)
        })
        .collect()
}

fn unavailable(service: &'static str) -> api_client::Error {
    api_client::Error::Rejected { service, message: "unavailable".to_string() }
}

// --- Market data ---

pub struct StubCandles(Option<Vec<Candle>>);

impl StubCandles {
    pub fn ok(candles: Vec<Candle>) -> Self {
        Self(Some(candles))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl CandleSource for StubCandles {
    async fn fetch_candles(&self, _symbol: &Symbol, _interval: &str, _limit: u32) -> api_client::Result<Vec<Candle>> {
        self.0.clone().ok_or_else(|| unavailable("binance"))
    }
}

#[derive(Default)]
pub struct CountingCandles {
    candles: Vec<Candle>,
    count: Counter,
}

impl CountingCandles {
    pub fn with_candles(candles: Vec<Candle>) -> Self {
        Self { candles, count: Counter::default() }
    }

    pub fn count(&self) -> Counter {
        self.count.clone()
    }
}

#[async_trait]
impl CandleSource for CountingCandles {
    async fn fetch_candles(&self, _symbol: &Symbol, _interval: &str, _limit: u32) -> api_client::Result<Vec<Candle>> {
        self.count.increment();
        Ok(self.candles.clone())
    }
}

#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

// --- News and sentiment ---

pub struct StubHeadlines(Option<Vec<String>>);

impl StubHeadlines {
    pub fn ok(headlines: &[&str]) -> Self {
        Self(Some(headlines.iter().map(|h| h.to_string()).collect()))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl HeadlineSource for StubHeadlines {
    async fn fetch_headlines(&self, _query: &str) -> api_client::Result<Vec<String>> {
        self.0.clone().ok_or_else(|| unavailable("newsapi"))
    }
}

pub struct StubScorer(Option<f64>);

impl StubScorer {
    pub fn ok(score: f64) -> Self {
        Self(Some(score))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl SentimentScorer for StubScorer {
    async fn score(&self, _headlines: &[String]) -> api_client::Result<f64> {
        self.0.ok_or_else(|| unavailable("huggingface"))
    }
}

// --- Alerts ---

#[derive(Clone, Default)]
pub struct SentMessages(Arc<Mutex<Vec<String>>>);

impl SentMessages {
    pub fn sink(&self) -> Box<dyn AlertSink> {
        Box::new(self.clone())
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for SentMessages {
    async fn send(&self, text: &str) -> api_client::Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct FailingSink;

#[async_trait]
impl AlertSink for FailingSink {
    async fn send(&self, _text: &str) -> api_client::Result<()> {
        Err(api_client::Error::ApiError { code: 400, msg: "Bad Request: chat not found".to_string() })
    }
}

// --- Strategies ---

/// Always answers `signal` and records the sentiment it was given.
pub struct FixedStrategy {
    signal: Signal,
    calls: StrategyCalls,
}

impl FixedStrategy {
    pub fn new(signal: Signal) -> Self {
        Self { signal, calls: StrategyCalls::default() }
    }

    pub fn calls(&self) -> StrategyCalls {
        self.calls.clone()
    }
}

#[derive(Clone, Default)]
pub struct StrategyCalls(Arc<Mutex<Vec<f64>>>);

impl StrategyCalls {
    pub fn sentiments(&self) -> Vec<f64> {
        self.0.lock().unwrap().clone()
    }
}

impl Strategy for FixedStrategy {
    fn name(&self) -> &'static str {
        "Fixed"
    }

    fn prepare(&self, _candles: &mut [Candle]) -> strategies::Result<()> {
        Ok(())
    }

    fn check_data(&self, _candles: &[Candle]) -> DataCheck {
        DataCheck::Ready
    }

    fn assess(&self, _candles: &[Candle], sentiment: f64) -> strategies::Result<Signal> {
        self.calls.0.lock().unwrap().push(sentiment);
        Ok(self.signal)
    }
}

pub struct FailingStrategy;

impl Strategy for FailingStrategy {
    fn name(&self) -> &'static str {
        "Failing"
    }

    fn prepare(&self, _candles: &mut [Candle]) -> strategies::Result<()> {
        Ok(())
    }

    fn check_data(&self, _candles: &[Candle]) -> DataCheck {
        DataCheck::Ready
    }

    fn assess(&self, _candles: &[Candle], _sentiment: f64) -> strategies::Result<Signal> {
        Err(strategies::Error::InvalidInput("sentiment score is NaN".to_string()))
    }
}
