// In crates/api-client/src/telegram.rs

use std::fmt;

use app_config::TelegramSettings;
use async_trait::async_trait;

use crate::types::{SendMessageRequest, TelegramResponse};
use crate::{AlertSink, Error, Result};

/// Delivers alerts to one Telegram chat through the Bot API.
///
/// The bot token is part of the request path, so it is kept out of `Debug`
/// and stripped from request errors.
#[derive(Clone)]
pub struct TelegramNotifier {
    http_client: reqwest::Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(http_client: reqwest::Client, settings: &TelegramSettings, bot_token: &str, chat_id: &str) -> Self {
        Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.bot_token)
    }

    /// Builds a notifier when both the bot token and the chat id are configured.
    pub fn from_settings(http_client: reqwest::Client, settings: &TelegramSettings) -> Option<Self> {
        let (token, chat_id) = settings.credentials()?;
        Some(Self::new(http_client, settings, token, chat_id))
    }
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("base_url", &self.base_url)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let request = SendMessageRequest { chat_id: &self.chat_id, text };

        let body = self
            .http_client
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::RequestFailed(e.without_url()))?
            .text()
            .await
            .map_err(|e| Error::RequestFailed(e.without_url()))?;

        parse_send_response(&body)
    }
}

/// Checks the Bot API envelope of a `sendMessage` call.
pub fn parse_send_response(body: &str) -> Result<()> {
    let response: TelegramResponse = serde_json::from_str(body)?;
    if response.ok {
        return Ok(());
    }
    Err(Error::ApiError {
        code: response.error_code.unwrap_or_default(),
        msg: response.description.unwrap_or_else(|| "Unknown error".to_string()),
    })
}
