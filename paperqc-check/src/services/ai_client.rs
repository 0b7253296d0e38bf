//! Remote AI reviewer client
//!
//! Talks to a DashScope-style chat-completion API for qualitative review:
//! title clarity, content logic consistency, and a duplication-rate
//! estimate. Every call is best-effort from the pipeline's point of view:
//! callers convert any failure into "zero additional findings". Requests
//! carry a hard wall-clock timeout so a hung remote cannot stall a check.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";
const DEFAULT_MODEL: &str = "qwen-max";

/// Hard wall-clock bound on one AI request
pub const AI_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// AI client errors
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Unusable response: {0}")]
    Parse(String),
}

/// Qualitative title review
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiTitleReview {
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub clarity_score: Option<f64>,
}

/// One logic finding inside a content review
#[derive(Debug, Clone, Deserialize)]
pub struct AiContentIssue {
    #[serde(default)]
    pub location: Option<String>,
    pub description: String,
}

/// Content logic-consistency review
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiContentReview {
    #[serde(default)]
    pub issues: Vec<AiContentIssue>,
    #[serde(default)]
    pub logic_score: Option<f64>,
}

/// Duplication-rate estimate, rate in [0, 100]
#[derive(Debug, Clone, Deserialize)]
pub struct AiDuplicationReport {
    pub duplicate_rate: f64,
}

/// Qualitative review capability consumed by the stage checkers
#[async_trait]
pub trait AiReviewer: Send + Sync {
    async fn review_title(
        &self,
        title: &str,
        similar_titles: &[String],
    ) -> Result<AiTitleReview, AiError>;

    async fn review_content(&self, text: &str) -> Result<AiContentReview, AiError>;

    async fn duplication_rate(&self, text: &str) -> Result<AiDuplicationReport, AiError>;
}

/// DashScope chat-completion client
pub struct QwenClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl QwenClient {
    pub fn new(
        api_key: String,
        api_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(AI_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Send one prompt, return the model's reply text
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let payload = json!({
            "model": self.model,
            "input": {
                "messages": [
                    { "role": "user", "content": prompt }
                ]
            },
            "parameters": { "result_format": "message" }
        });

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api(status.as_u16(), body));
        }

        let reply: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        reply
            .output
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiError::Parse("Empty choice list".to_string()))
    }
}

#[async_trait]
impl AiReviewer for QwenClient {
    async fn review_title(
        &self,
        title: &str,
        similar_titles: &[String],
    ) -> Result<AiTitleReview, AiError> {
        let mut prompt = format!(
            "Review the quality of this thesis title:\n\
             Title: {title}\n"
        );
        if !similar_titles.is_empty() {
            prompt.push_str("\nExisting similar titles:\n");
            for similar in similar_titles {
                prompt.push_str(&format!("- {similar}\n"));
            }
        }
        prompt.push_str(
            "\nAssess clarity, academic register, length, and logical \
             soundness. Reply with JSON only:\n\
             {\"clarity_score\": 0-100, \"issues\": [\"...\"], \"suggestions\": [\"...\"]}\n",
        );

        let content = self.complete(&prompt).await?;
        parse_model_json(&content)
    }

    async fn review_content(&self, text: &str) -> Result<AiContentReview, AiError> {
        let prompt = format!(
            "Review the logical consistency of this thesis excerpt:\n\
             {text}\n\n\
             Assess paragraph coherence, argument consistency, and \
             contradictions. Reply with JSON only:\n\
             {{\"logic_score\": 0-100, \"issues\": \
             [{{\"location\": \"paragraph N\", \"description\": \"...\"}}]}}\n"
        );

        let content = self.complete(&prompt).await?;
        parse_model_json(&content)
    }

    async fn duplication_rate(&self, text: &str) -> Result<AiDuplicationReport, AiError> {
        let prompt = format!(
            "Estimate how much of this thesis excerpt duplicates commonly \
             published academic text:\n\
             {text}\n\n\
             Reply with JSON only: {{\"duplicate_rate\": 0-100}}\n"
        );

        let content = self.complete(&prompt).await?;
        parse_model_json(&content)
    }
}

/// Extract and deserialize the JSON object embedded in a model reply.
///
/// Models wrap JSON in code fences or prose more often than not, so take
/// the outermost brace-delimited slice.
fn parse_model_json<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, AiError> {
    let start = content
        .find('{')
        .ok_or_else(|| AiError::Parse("No JSON object in reply".to_string()))?;
    let end = content
        .rfind('}')
        .ok_or_else(|| AiError::Parse("No JSON object in reply".to_string()))?;
    if end < start {
        return Err(AiError::Parse("No JSON object in reply".to_string()));
    }

    serde_json::from_str(&content[start..=end]).map_err(|e| AiError::Parse(e.to_string()))
}

#[derive(Debug, Deserialize, Serialize)]
struct CompletionResponse {
    output: CompletionOutput,
}

#[derive(Debug, Deserialize, Serialize)]
struct CompletionOutput {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize, Serialize)]
struct CompletionMessage {
    content: String,
}
