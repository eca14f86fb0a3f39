pub mod error;
mod types;

pub use error::{InferenceError, Result};
pub use types::{LabelScore, ZeroShotOutput};

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use types::{
    RequestOptions, SentimentWire, TextRequest, ZeroShotParameters, ZeroShotRequest, ZeroShotWire,
};

/// Client for a hosted inference API exposing one endpoint per model
/// (`{base_url}/{model}`), authenticated with a bearer token.
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    zero_shot_model: String,
    sentiment_model: String,
}

impl InferenceClient {
    pub fn new(
        base_url: &str,
        token: &str,
        zero_shot_model: &str,
        sentiment_model: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            zero_shot_model: zero_shot_model.to_string(),
            sentiment_model: sentiment_model.to_string(),
        })
    }

    /// Score `text` against each candidate label. Scores sum to 1 across labels.
    pub async fn zero_shot(&self, text: &str, labels: &[&str]) -> Result<ZeroShotOutput> {
        let body = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
                multi_label: false,
            },
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        debug!(model = %self.zero_shot_model, labels = labels.len(), "Zero-shot request");
        let wire: ZeroShotWire = self.post(&self.zero_shot_model, &body).await?;
        Ok(wire.into())
    }

    /// Three-class sentiment distribution for `text`.
    pub async fn sentiment(&self, text: &str) -> Result<Vec<LabelScore>> {
        let body = TextRequest {
            inputs: text,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        debug!(model = %self.sentiment_model, "Sentiment request");
        let wire: SentimentWire = self.post(&self.sentiment_model, &body).await?;
        Ok(wire.into())
    }

    async fn post<B, T>(&self, model: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let endpoint = format!("{}/{}", self.base_url, model);

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}
