// In crates/app-config/src/types.rs

use serde::Deserialize;

use core_types::Symbol;
use strategies::SignalSettings;

use crate::{Error, Result};

/// Binance caps `/api/v3/klines` at this many candles per request. KuCoin
/// allows 1500, so the lower cap holds for both.
pub const MAX_CANDLE_LIMIT: u32 = 1000;

/// The exchanges candles can be fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    Binance,
    Kucoin,
}

impl Exchange {
    /// Matches an exchange name case-insensitively.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(Exchange::Binance),
            "kucoin" => Ok(Exchange::Kucoin),
            _ => Err(Error::InvalidSetting(format!(
                "market.exchange must be one of binance, kucoin; got '{name}'"
            ))),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Which pair to watch and how often.
    #[serde(default)]
    pub market: MarketSettings,
    /// Settings for the Binance API.
    #[serde(default)]
    pub binance: BinanceSettings,
    /// Settings for the KuCoin API.
    #[serde(default)]
    pub kucoin: KucoinSettings,
    /// Settings for the NewsAPI headline search.
    #[serde(default)]
    pub news: NewsSettings,
    /// Settings for the hosted sentiment model.
    #[serde(default)]
    pub sentiment: SentimentSettings,
    /// Settings for Telegram alert delivery.
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub http: HttpSettings,
    /// Gate thresholds and indicator lookbacks for the decision engine.
    #[serde(default)]
    pub signal: SignalSettings,
}

impl Settings {
    /// Checks everything serde cannot: parameter ordering, non-zero periods and
    /// a well-formed trading pair.
    pub fn validate(&self) -> Result<()> {
        self.signal.validate()?;
        self.market.symbol()?;
        self.market.exchange()?;

        if !(2..=MAX_CANDLE_LIMIT).contains(&self.market.candle_limit) {
            return Err(Error::InvalidSetting(format!(
                "market.candle_limit must be between 2 and {MAX_CANDLE_LIMIT}, got {}",
                self.market.candle_limit
            )));
        }
        if self.market.check_interval_secs == 0 {
            return Err(Error::InvalidSetting("market.check_interval_secs must be greater than 0".into()));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(Error::InvalidSetting("http.request_timeout_secs must be greater than 0".into()));
        }
        if self.news.page_size == 0 || self.news.page_size > 100 {
            return Err(Error::InvalidSetting(format!(
                "news.page_size must be between 1 and 100, got {}",
                self.news.page_size
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment whose override file was loaded. Always set from the
    /// name passed to the loader, never from the files.
    #[serde(default)]
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MarketSettings {
    /// Exchange to fetch candles from ("binance" or "kucoin").
    pub exchange: String,
    /// Trading pair in `BASE/QUOTE` notation.
    pub symbol: String,
    /// Candle timeframe, in Binance notation ("1m", "1h", "1d", ...).
    pub interval: String,
    /// How many of the most recent candles to fetch each cycle.
    pub candle_limit: u32,
    /// Seconds between two signal checks.
    pub check_interval_secs: u64,
}

impl MarketSettings {
    pub fn symbol(&self) -> Result<Symbol> {
        Ok(Symbol::parse(&self.symbol)?)
    }

    pub fn exchange(&self) -> Result<Exchange> {
        Exchange::parse(&self.exchange)
    }
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            exchange: "binance".to_string(),
            symbol: "BTC/USDT".to_string(),
            interval: "1h".to_string(),
            candle_limit: 200,
            check_interval_secs: 300,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BinanceSettings {
    /// The REST API base URL for Binance.
    pub rest_base_url: String,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self { rest_base_url: "https://api.binance.com".to_string() }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct KucoinSettings {
    pub rest_base_url: String,
}

impl Default for KucoinSettings {
    fn default() -> Self {
        Self { rest_base_url: "https://api.kucoin.com".to_string() }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NewsSettings {
    /// NewsAPI key. Usually supplied through `NEWS_API_KEY`.
    pub api_key: Option<String>,
    pub query: String,
    pub page_size: u32,
    pub language: String,
    pub base_url: String,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            query: "Bitcoin".to_string(),
            page_size: 100,
            language: "en".to_string(),
            base_url: "https://newsapi.org".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SentimentSettings {
    /// Hugging Face model id of the financial sentiment classifier.
    pub model: String,
    pub base_url: String,
    /// Inference API token. Usually supplied through `HF_API_TOKEN`.
    pub api_token: Option<String>,
}

impl Default for SentimentSettings {
    fn default() -> Self {
        Self {
            model: "ProsusAI/finbert".to_string(),
            base_url: "https://api-inference.huggingface.co".to_string(),
            api_token: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TelegramSettings {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub base_url: String,
}

impl TelegramSettings {
    /// The bot token and chat id, when both are configured and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.bot_token.as_deref().filter(|t| !t.trim().is_empty())?;
        let chat_id = self.chat_id.as_deref().filter(|c| !c.trim().is_empty())?;
        Some((token, chat_id))
    }
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            base_url: "https://api.telegram.org".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HttpSettings {
    pub request_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { request_timeout_secs: 30 }
    }
}
