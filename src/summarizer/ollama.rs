//! Ollama `/api/generate` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::OllamaConfig;
use crate::summarizer::{Summarizer, SummarizerError};

/// Generation can be slow on CPU-only hosts.
const REQUEST_TIMEOUT_SECS: u64 = 120;

const PROMPT_PREFIX: &str = "Briefly Summarize this: ";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Summarizer backed by an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaSummarizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaSummarizer {
    pub fn new(config: &OllamaConfig) -> Result<Self, SummarizerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SummarizerError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.api_url.clone(),
            model: config.model_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizerError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: format!("{}{}", PROMPT_PREFIX, text),
            stream: false,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|source| SummarizerError::Http {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SummarizerError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse =
            resp.json().await.map_err(|source| SummarizerError::Deserialization {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        tracing::debug!("Summary generated by model {}", self.model);
        Ok(generated.response)
    }
}
