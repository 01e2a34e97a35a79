//! Post summarization through an external language model.

pub mod error;
pub mod ollama;

use async_trait::async_trait;

pub use error::SummarizerError;
pub use ollama::OllamaSummarizer;

/// Turns a block of text into a short summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizerError>;
}

/// Used when no summarization backend is configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String, SummarizerError> {
        Err(SummarizerError::Disabled)
    }
}
