// In crates/api-client/src/types.rs

use serde::{Deserialize, Serialize};

/// Temporary struct to deserialize the kline response from Binance,
/// which is a JSON array of mixed types.
#[derive(Debug, Deserialize)]
pub struct RawKline(
    pub i64,    // 0: Open time
    pub String, // 1: Open
    pub String, // 2: High
    pub String, // 3: Low
    pub String, // 4: Close
    pub String, // 5: Volume
    pub i64,    // 6: Close time
    pub String, // 7: Quote asset volume
    pub i64,    // 8: Number of trades
    pub String, // 9: Taker buy base asset volume
    pub String, // 10: Taker buy quote asset volume
    pub String, // 11: Ignore
);

/// The envelope KuCoin wraps every response in. `code` is "200000" on success.
#[derive(Debug, Deserialize)]
pub struct KucoinResponse<T> {
    pub code: String,
    pub data: Option<T>,
    pub msg: Option<String>,
}

/// One row of KuCoin's `/api/v1/market/candles`. Note the close comes before
/// high and low, unlike Binance.
#[derive(Debug, Deserialize)]
pub struct RawKucoinCandle(
    pub String, // 0: Start time, seconds
    pub String, // 1: Open
    pub String, // 2: Close
    pub String, // 3: High
    pub String, // 4: Low
    pub String, // 5: Volume
    pub String, // 6: Turnover
);

/// The envelope NewsAPI wraps every response in.
#[derive(Debug, Deserialize)]
pub struct NewsResponse {
    /// "ok" or "error".
    pub status: String,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    /// Set when `status` is "error" (e.g. "apiKeyInvalid", "rateLimited").
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsArticle {
    pub title: Option<String>,
}

/// One class probability from a text-classification model.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Request body for the Hugging Face inference API.
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a [String],
    pub parameters: InferenceParameters,
    pub options: InferenceOptions,
}

#[derive(Debug, Serialize)]
pub struct InferenceParameters {
    /// Ask for every class, not only the winning one.
    pub top_k: u8,
}

#[derive(Debug, Serialize)]
pub struct InferenceOptions {
    pub wait_for_model: bool,
}

/// The inference API answers a batch with one list of label scores per input,
/// collapses a single-input batch to a flat list, and reports failures as an
/// `{"error": ...}` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    Batch(Vec<Vec<LabelScore>>),
    Single(Vec<LabelScore>),
    Failure { error: String },
}

/// Request body for Telegram's `sendMessage`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// The envelope the Telegram Bot API wraps every response in.
#[derive(Debug, Deserialize)]
pub struct TelegramResponse {
    pub ok: bool,
    pub error_code: Option<i64>,
    pub description: Option<String>,
}
