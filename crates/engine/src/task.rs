// In crates/engine/src/task.rs

use std::time::Duration;

use api_client::{
    AlertSink, BinanceClient, CandleSource, FinbertScorer, HeadlineSource, KucoinClient, NewsApiClient,
    SentimentScorer, TelegramNotifier,
};
use app_config::{Exchange, Settings};
use core_types::{Candle, Signal, Symbol};
use strategies::{SignalEngine, Strategy};

use crate::alert::SignalAlert;

/// What one signal cycle ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No market data, so no decision was made.
    Skipped { reason: String },
    Decided { signal: Signal, sentiment: f64, alerted: bool },
}

/// The external services a task talks to.
pub struct Collaborators {
    pub candles: Box<dyn CandleSource>,
    pub headlines: Box<dyn HeadlineSource>,
    pub scorer: Box<dyn SentimentScorer>,
    /// `None` when no delivery channel is configured.
    pub alerts: Option<Box<dyn AlertSink>>,
}

/// Runs the full fetch, score, decide and alert pipeline for a single pair.
pub struct SignalTask {
    symbol: Symbol,
    interval: String,
    candle_limit: u32,
    news_query: String,
    strategy: Box<dyn Strategy>,
    collaborators: Collaborators,
}

impl SignalTask {
    pub fn new(
        symbol: Symbol,
        interval: String,
        candle_limit: u32,
        news_query: String,
        strategy: Box<dyn Strategy>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            symbol,
            interval,
            candle_limit,
            news_query,
            strategy,
            collaborators,
        }
    }

    /// Wires the exchange, NewsAPI, Hugging Face and Telegram clients from settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let Some(news_api_key) = settings.news.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            anyhow::bail!("NEWS_API_KEY is not set. The bot cannot run without a news source.");
        };

        let symbol = settings.market.symbol()?;
        let exchange = settings.market.exchange()?;
        let strategy = SignalEngine::new(&settings.signal)?;
        let http_client = api_client::http_client(Duration::from_secs(settings.http.request_timeout_secs))?;

        let candles: Box<dyn CandleSource> = match exchange {
            Exchange::Binance => Box::new(BinanceClient::new(http_client.clone(), &settings.binance)),
            Exchange::Kucoin => {
                if api_client::kucoin::candle_type(&settings.market.interval).is_none() {
                    anyhow::bail!("KuCoin has no '{}' candles.", settings.market.interval);
                }
                Box::new(KucoinClient::new(http_client.clone(), &settings.kucoin))
            }
        };
        tracing::debug!(?exchange, "Selected candle source.");

        let alerts = TelegramNotifier::from_settings(http_client.clone(), &settings.telegram)
            .map(|notifier| Box::new(notifier) as Box<dyn AlertSink>);
        if alerts.is_none() {
            tracing::warn!("Telegram credentials not found. Signals will be logged but not delivered.");
        }

        let collaborators = Collaborators {
            candles,
            headlines: Box::new(NewsApiClient::new(http_client.clone(), news_api_key, &settings.news)),
            scorer: Box::new(FinbertScorer::new(http_client, &settings.sentiment)),
            alerts,
        };

        Ok(Self::new(
            symbol,
            settings.market.interval.clone(),
            settings.market.candle_limit,
            settings.news.query.clone(),
            Box::new(strategy),
            collaborators,
        ))
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Runs one cycle.
    ///
    /// Collaborator failures are logged and degrade the cycle (skipped, or
    /// neutral sentiment, or no delivery). Only a strategy error is returned.
    pub async fn check_for_signals(&self) -> anyhow::Result<CycleOutcome> {
        tracing::info!(symbol = %self.symbol, interval = %self.interval, strategy = self.strategy.name(), "Checking for signals.");

        // --- 1. Market data ---
        let mut candles = match self
            .collaborators
            .candles
            .fetch_candles(&self.symbol, &self.interval, self.candle_limit)
            .await
        {
            Ok(candles) if !candles.is_empty() => candles,
            Ok(_) => {
                tracing::warn!(symbol = %self.symbol, "Market data came back empty. Skipping this check.");
                return Ok(CycleOutcome::Skipped { reason: "no market data".to_string() });
            }
            Err(e) => {
                tracing::warn!(symbol = %self.symbol, error = %e, "Could not fetch market data. Skipping this check.");
                return Ok(CycleOutcome::Skipped { reason: format!("market data unavailable: {e}") });
            }
        };

        // --- 2. News sentiment ---
        let sentiment = self.sentiment().await;

        // --- 3. Indicators and decision ---
        self.strategy.prepare(&mut candles)?;

        let check = self.strategy.check_data(&candles);
        if !check.is_ready() {
            tracing::info!(symbol = %self.symbol, cause = %check, "Not enough usable data for a decision.");
        }

        let signal = self.strategy.assess(&candles, sentiment)?;
        tracing::info!(symbol = %self.symbol, %signal, sentiment, "Generated signal.");

        // --- 4. Alert ---
        let alerted = if signal.is_actionable() {
            self.dispatch_alert(signal, &candles, sentiment).await
        } else {
            tracing::info!("Signal is HOLD. No action required.");
            false
        };

        Ok(CycleOutcome::Decided { signal, sentiment, alerted })
    }

    /// Scores the latest headlines; any failure or an empty result is neutral.
    async fn sentiment(&self) -> f64 {
        tracing::debug!(query = %self.news_query, "Fetching news.");
        let headlines = match self.collaborators.headlines.fetch_headlines(&self.news_query).await {
            Ok(headlines) => headlines,
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch news headlines.");
                Vec::new()
            }
        };

        if headlines.is_empty() {
            tracing::info!("No headlines available. Proceeding with neutral sentiment.");
            return 0.0;
        }

        match self.collaborators.scorer.score(&headlines).await {
            Ok(score) if !score.is_nan() => {
                tracing::info!(score, headlines = headlines.len(), "Calculated sentiment score.");
                score
            }
            Ok(_) => {
                tracing::warn!("Sentiment scorer returned NaN. Proceeding with neutral sentiment.");
                0.0
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sentiment scoring failed. Proceeding with neutral sentiment.");
                0.0
            }
        }
    }

    /// Returns whether the alert was delivered.
    async fn dispatch_alert(&self, signal: Signal, candles: &[Candle], sentiment: f64) -> bool {
        let Some(sink) = &self.collaborators.alerts else {
            tracing::warn!(%signal, "Telegram credentials not found. Cannot send alert.");
            return false;
        };
        let Some(latest) = candles.last() else {
            return false;
        };

        let alert = SignalAlert {
            symbol: &self.symbol,
            signal,
            price: latest.close,
            sentiment,
            timeframe: &self.interval,
        };

        match sink.send(&alert.to_string()).await {
            Ok(()) => {
                tracing::info!(symbol = %self.symbol, %signal, "Alert sent.");
                true
            }
            Err(e) => {
                tracing::error!(symbol = %self.symbol, %signal, error = %e, "Failed to send alert.");
                false
            }
        }
    }
}
