// In crates/api-client/src/news.rs

use app_config::NewsSettings;
use async_trait::async_trait;

use crate::types::NewsResponse;
use crate::{Error, HeadlineSource, Result};

/// NewsAPI marks articles pulled by their publisher with this title.
const REMOVED_TITLE: &str = "[Removed]";

/// Client for the NewsAPI `/v2/everything` search endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(http_client: reqwest::Client, api_key: impl Into<String>, settings: &NewsSettings) -> Self {
        Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            language: settings.language.clone(),
            page_size: settings.page_size,
        }
    }
}

#[async_trait]
impl HeadlineSource for NewsApiClient {
    /// Searches for the newest articles matching `query`.
    async fn fetch_headlines(&self, query: &str) -> Result<Vec<String>> {
        let url = format!("{}/v2/everything", self.base_url);
        let page_size = self.page_size.to_string();

        let body = self
            .http_client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("language", self.language.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        let headlines = parse_headlines(&body)?;
        tracing::debug!(query, count = headlines.len(), "Fetched headlines.");
        Ok(headlines)
    }
}

/// Extracts the article titles from a NewsAPI response body.
pub fn parse_headlines(body: &str) -> Result<Vec<String>> {
    let response: NewsResponse = serde_json::from_str(body)?;

    if response.status != "ok" {
        let code = response.code.unwrap_or_else(|| response.status.clone());
        let message = response.message.unwrap_or_default();
        return Err(Error::Rejected { service: "newsapi", message: format!("{code}: {message}") });
    }

    Ok(response
        .articles
        .into_iter()
        .filter_map(|article| article.title)
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty() && title != REMOVED_TITLE)
        .collect())
}
