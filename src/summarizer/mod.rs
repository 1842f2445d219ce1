//! Hierarchical reduction summarizer.
//!
//! Article lengths are unbounded; the summarization capability is not. The
//! summarizer chunks the text, reduces each chunk, then reduces the joined
//! partials, recursing until the remainder fits a single chunk. Early-chunk
//! content survives in order instead of being truncated away. Any model
//! failure at any stage drops to a deterministic excerpt, which cannot fail.

pub mod capability;
pub mod chunk;
pub mod remote;

pub use capability::{ImageCaptioner, SummarizeError, TextSummarizer};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SummaryConfig;

// Bound on Chunk→Reduce passes, against a model whose output refuses to
// shrink. With a sane capability two passes cover hundreds of chunks.
const MAX_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMethod {
    ModelGenerated,
    ExcerptFallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary_text: String,
    pub source_word_count: usize,
    pub method: SummaryMethod,
}

pub struct Summarizer {
    config: SummaryConfig,
}

impl Summarizer {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    /// Summarize one article body. Always returns a result; the excerpt path
    /// has no failure mode.
    pub async fn summarize(
        &self,
        body_text: &str,
        model: &dyn TextSummarizer,
    ) -> SummaryResult {
        let normalized = chunk::normalize(body_text, self.config.max_input_chars);
        let source_word_count = normalized.split_whitespace().count();

        match self.reduce_to_one(&normalized, model).await {
            Ok(summary_text) => SummaryResult {
                summary_text,
                source_word_count,
                method: SummaryMethod::ModelGenerated,
            },
            Err(err) => {
                warn!(error = %err, "summarization failed, falling back to excerpt");
                SummaryResult {
                    summary_text: self.excerpt(&normalized),
                    source_word_count,
                    method: SummaryMethod::ExcerptFallback,
                }
            }
        }
    }

    async fn reduce_to_one(
        &self,
        normalized: &str,
        model: &dyn TextSummarizer,
    ) -> Result<String, SummarizeError> {
        let mut current = normalized.to_string();

        for pass in 0..MAX_PASSES {
            let chunks = chunk::chunk_by_words(&current, self.config.chunk_words);
            match chunks.len() {
                0 => return Err(SummarizeError::Degenerate),
                1 => {
                    // Single chunk: one invocation and we are done. On the
                    // first pass this is the whole (short) article; on later
                    // passes it is the joined partials getting their final
                    // polish.
                    let max_words = if pass == 0 {
                        self.config.reduce_words
                    } else {
                        self.config.final_reduce_words
                    };
                    return invoke(model, &chunks[0], max_words).await;
                }
                n => {
                    debug!(chunks = n, pass, "reducing chunks");
                    let mut partials = Vec::with_capacity(n);
                    for piece in &chunks {
                        partials.push(invoke(model, piece, self.config.reduce_words).await?);
                    }
                    current = partials.join("\n");
                }
            }
        }

        Err(SummarizeError::Model(format!(
            "no convergence after {} passes",
            MAX_PASSES
        )))
    }

    /// First words of the normalized body plus an ellipsis marker. Total
    /// function of its input; this is the path that guarantees `summarize`
    /// always produces something.
    fn excerpt(&self, normalized: &str) -> String {
        let words: Vec<&str> = normalized
            .split_whitespace()
            .take(self.config.excerpt_words)
            .collect();
        let mut text = words.join(" ");
        text.push('…');
        text
    }
}

async fn invoke(
    model: &dyn TextSummarizer,
    text: &str,
    max_words: usize,
) -> Result<String, SummarizeError> {
    let output = model.summarize(text, max_words).await?;
    let output = output.trim();
    if output.is_empty() {
        return Err(SummarizeError::Degenerate);
    }
    Ok(output.to_string())
}
