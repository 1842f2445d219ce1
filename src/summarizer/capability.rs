use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("model call failed: {0}")]
    Model(String),

    #[error("model returned degenerate output")]
    Degenerate,

    #[error("model call timed out")]
    Timeout,
}

/// Text summarization capability. Implementations own their transport,
/// timeouts and any model-specific batching; the pipeline only ever asks for
/// one bounded summary at a time and the caller chooses the concurrency
/// strategy.
#[async_trait]
pub trait TextSummarizer: Send + Sync {
    async fn summarize(&self, text: &str, max_words: usize) -> Result<String, SummarizeError>;
}

/// Image captioning capability, consumed by the summarize pass.
#[async_trait]
pub trait ImageCaptioner: Send + Sync {
    async fn caption(&self, jpeg: &[u8]) -> Result<String, SummarizeError>;
}
