//! Summarization pass over a persisted session directory.
//!
//! Walks every article folder, produces a text summary record for each
//! article, and a caption record for each image when a captioner endpoint is
//! configured. Runs sequentially: the underlying model capability is not
//! assumed to support concurrent invocation.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use newsclip::config::Config;
use newsclip::session::store::{
    ARTICLE_FILE, IMAGE_FILE, IMAGE_SUMMARY_FILE, TEXT_SUMMARY_FILE, read_article, write_summary,
};
use newsclip::session::{SummaryKind, SummaryRecord};
use newsclip::summarizer::remote::{HttpCaptioner, HttpSummarizer};
use newsclip::summarizer::{
    ImageCaptioner, SummarizeError, Summarizer, TextSummarizer,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Stands in when no endpoint is configured; every call fails, which lands
/// every article on the excerpt fallback.
struct UnconfiguredModel;

#[async_trait]
impl TextSummarizer for UnconfiguredModel {
    async fn summarize(&self, _text: &str, _max_words: usize) -> Result<String, SummarizeError> {
        Err(SummarizeError::Model(
            "no summarizer endpoint configured".to_string(),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Some(session_dir) = std::env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: summarize <session-dir>");
    };
    if !session_dir.is_dir() {
        bail!("not a directory: {}", session_dir.display());
    }

    let config = Config::from_env()?;
    let summarizer = Summarizer::new(config.summary.clone());

    let model: Box<dyn TextSummarizer> = match &config.summarizer_endpoint {
        Some(endpoint) => Box::new(HttpSummarizer::new(
            endpoint.clone(),
            config.runner.model_timeout_secs,
        )?),
        None => {
            warn!("no summarizer endpoint configured; producing excerpt summaries");
            Box::new(UnconfiguredModel)
        }
    };
    let captioner: Option<Box<dyn ImageCaptioner>> = match &config.captioner_endpoint {
        Some(endpoint) => Some(Box::new(HttpCaptioner::new(
            endpoint.clone(),
            config.runner.model_timeout_secs,
        )?)),
        None => None,
    };

    let mut text_count = 0usize;
    let mut image_count = 0usize;

    let mut entries = tokio::fs::read_dir(&session_dir)
        .await
        .with_context(|| format!("reading {}", session_dir.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let dir = entry.path();

        let record = match read_article(&dir).await {
            Ok(record) => record,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "no readable article record, skipping");
                continue;
            }
        };

        let result = summarizer.summarize(&record.body_text, model.as_ref()).await;
        let summary = SummaryRecord {
            filename: ARTICLE_FILE.to_string(),
            summary_type: SummaryKind::Text,
            summary: result.summary_text,
        };
        match write_summary(&dir, TEXT_SUMMARY_FILE, &summary).await {
            Ok(()) => {
                info!(dir = %dir.display(), method = ?result.method, "text summary written");
                text_count += 1;
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "failed to write text summary");
                continue;
            }
        }

        let Some(captioner) = &captioner else {
            continue;
        };
        let image_path = dir.join(IMAGE_FILE);
        let Ok(jpeg) = tokio::fs::read(&image_path).await else {
            continue;
        };
        match captioner.caption(&jpeg).await {
            Ok(caption) => {
                let record = SummaryRecord {
                    filename: IMAGE_FILE.to_string(),
                    summary_type: SummaryKind::Image,
                    summary: caption,
                };
                match write_summary(&dir, IMAGE_SUMMARY_FILE, &record).await {
                    Ok(()) => {
                        image_count += 1;
                    }
                    Err(err) => {
                        warn!(dir = %dir.display(), error = %err, "failed to write image summary");
                    }
                }
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "caption failed, skipping image");
            }
        }
    }

    info!(text_count, image_count, "summarization pass complete");
    Ok(())
}
