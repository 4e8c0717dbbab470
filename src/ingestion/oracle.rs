use async_trait::async_trait;
use log::warn;
use serde_json::{json, Value};
use tokio::time::sleep;

use super::{IngestionError, IngestionResult, OracleConfig};

/// The external text-completion service that performs the actual
/// classification, treated as a black box returning text.
///
/// The pipeline depends only on this trait; tests substitute canned
/// implementations.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Sends one prompt and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> IngestionResult<String>;
}

/// Outcome of a single request attempt. Transport failures and 5xx answers
/// may be retried; everything else (auth, quota, malformed replies) is
/// surfaced immediately.
enum AttemptError {
    Retryable(String),
    Fatal(String),
}

/// Oracle backed by an OpenAI-style chat-completions API.
pub struct OpenRouterClient {
    client: reqwest::Client,
    config: OracleConfig,
}

impl OpenRouterClient {
    /// Create a new client. Fails when no API key is configured.
    pub fn new(config: OracleConfig) -> IngestionResult<Self> {
        if !config.is_ready() {
            return Err(IngestionError::configuration_error(
                "Oracle API key is not configured",
            ));
        }
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| IngestionError::Oracle(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn request_once(&self, prompt: &str) -> Result<String, AttemptError> {
        let body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }]
        });

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    AttemptError::Retryable(e.to_string())
                } else {
                    AttemptError::Fatal(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AttemptError::Retryable(format!("oracle returned {}", status)));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AttemptError::Fatal(format!(
                "oracle returned {}: {}",
                status, detail
            )));
        }

        let value: Value = response.json().await.map_err(|e| {
            AttemptError::Fatal(format!("invalid completion response body: {}", e))
        })?;
        completion_text(&value).ok_or_else(|| {
            AttemptError::Fatal("completion response carried no message content".to_string())
        })
    }
}

/// Pulls the first choice's message content out of a chat-completions reply.
fn completion_text(value: &Value) -> Option<String> {
    value
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl Oracle for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> IngestionResult<String> {
        let mut attempt = 0;
        loop {
            match self.request_once(prompt).await {
                Ok(text) => return Ok(text),
                Err(AttemptError::Fatal(msg)) => return Err(IngestionError::Oracle(msg)),
                Err(AttemptError::Retryable(msg)) => {
                    if attempt >= self.config.max_retries {
                        return Err(IngestionError::Oracle(format!(
                            "{} (giving up after {} retries)",
                            msg, attempt
                        )));
                    }
                    let delay = self.config.retry_delay(attempt);
                    warn!("Oracle call failed ({}), retrying in {:?}", msg, delay);
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
