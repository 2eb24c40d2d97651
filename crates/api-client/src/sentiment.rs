// In crates/api-client/src/sentiment.rs

use app_config::SentimentSettings;
use async_trait::async_trait;

use crate::types::{InferenceOptions, InferenceParameters, InferenceRequest, InferenceResponse, LabelScore};
use crate::{Error, Result, SentimentScorer};

/// FinBERT classifies into positive, negative and neutral.
const FINBERT_LABELS: u8 = 3;

/// Scores headlines with a FinBERT-style classifier hosted on the Hugging Face
/// inference API.
///
/// Each headline scores `p(positive) - p(negative)`; the batch score is the
/// mean over headlines.
#[derive(Debug, Clone)]
pub struct FinbertScorer {
    http_client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

impl FinbertScorer {
    pub fn new(http_client: reqwest::Client, settings: &SentimentSettings) -> Self {
        Self {
            http_client,
            url: format!("{}/models/{}", settings.base_url.trim_end_matches('/'), settings.model),
            api_token: settings.api_token.clone(),
        }
    }
}

#[async_trait]
impl SentimentScorer for FinbertScorer {
    async fn score(&self, headlines: &[String]) -> Result<f64> {
        if headlines.is_empty() {
            return Ok(0.0);
        }

        let request = InferenceRequest {
            inputs: headlines,
            parameters: InferenceParameters { top_k: FINBERT_LABELS },
            options: InferenceOptions { wait_for_model: true },
        };

        let mut builder = self.http_client.post(&self.url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let body = builder
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        let scores = parse_scores(&body, headlines.len())?;
        let score = mean(&scores);
        tracing::debug!(headlines = headlines.len(), score, "Scored headlines.");
        Ok(score)
    }
}

/// Parses an inference response into one net score per headline.
pub fn parse_scores(body: &str, expected: usize) -> Result<Vec<f64>> {
    let per_headline = match serde_json::from_str::<InferenceResponse>(body)? {
        InferenceResponse::Batch(batch) => batch,
        InferenceResponse::Single(labels) => vec![labels],
        InferenceResponse::Failure { error } => {
            return Err(Error::Rejected { service: "huggingface", message: error });
        }
    };

    if per_headline.len() != expected {
        return Err(Error::MalformedResponse(format!(
            "expected {expected} classification(s), got {}",
            per_headline.len()
        )));
    }

    Ok(per_headline.iter().map(|labels| net_sentiment(labels)).collect())
}

/// `p(positive) - p(negative)` for one headline; a missing label counts as 0.
pub fn net_sentiment(labels: &[LabelScore]) -> f64 {
    let probability = |name: &str| {
        labels
            .iter()
            .find(|l| l.label.eq_ignore_ascii_case(name))
            .map_or(0.0, |l| l.score)
    };
    probability("positive") - probability("negative")
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
