//! Emotion Classification Client
//!
//! Client for a hosted text emotion classifier.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{round_to, EmotionDetection};

use crate::error::{AppError, AppResult};

/// Client for the emotion classification service
#[derive(Clone)]
pub struct SentimentClient {
    api_endpoint: String,
    api_key: Option<String>,
    http_client: Client,
}

#[derive(Debug, Serialize)]
pub struct ClassifyRequest<'a> {
    pub text: &'a str,
}

/// Response from the classification API
#[derive(Debug, Deserialize)]
pub struct ClassifyResponse {
    #[serde(alias = "label")]
    pub emotion: String,
    #[serde(alias = "score")]
    pub confidence: f64,
}

impl From<ClassifyResponse> for EmotionDetection {
    fn from(r: ClassifyResponse) -> Self {
        EmotionDetection {
            emotion: r.emotion.to_lowercase(),
            confidence: round_to(r.confidence, 2),
        }
    }
}

impl SentimentClient {
    pub fn new(api_endpoint: String, api_key: Option<String>) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            api_endpoint,
            api_key,
            http_client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Classify the emotion expressed in `text`
    pub async fn classify(&self, text: &str) -> AppResult<EmotionDetection> {
        let mut request = self
            .http_client
            .post(&self.api_endpoint)
            .header("Content-Type", "application/json")
            .json(&ClassifyRequest { text });
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::SentimentServiceError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::SentimentServiceError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: ClassifyResponse = response.json().await.map_err(|e| {
            AppError::SentimentServiceError(format!("Failed to parse response: {}", e))
        })?;

        Ok(result.into())
    }
}
