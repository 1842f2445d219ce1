//! Persistence seam. The pipeline hands records to an `ArticleStore` without
//! knowing whether they land on local disk or in a bucket; `FsStore` is the
//! local-disk implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::session::{ArticleRecord, SummaryRecord};

pub const ARTICLE_FILE: &str = "article.json";
pub const IMAGE_FILE: &str = "image.jpg";
pub const TEXT_SUMMARY_FILE: &str = "article_text_summary.json";
pub const IMAGE_SUMMARY_FILE: &str = "image_summary.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Persist one article under its slug, with its normalized image when
    /// one was selected.
    async fn persist_article(
        &self,
        slug: &str,
        record: &ArticleRecord,
        image_jpeg: Option<&[u8]>,
    ) -> Result<(), StoreError>;
}

/// Local-disk store: `<root>/<slug>/article.json` (+ `image.jpg`).
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(output_dir: &Path, session_id: &str) -> Self {
        Self {
            root: output_dir.join(session_id),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArticleStore for FsStore {
    async fn persist_article(
        &self,
        slug: &str,
        record: &ArticleRecord,
        image_jpeg: Option<&[u8]>,
    ) -> Result<(), StoreError> {
        let dir = self.root.join(slug);
        fs::create_dir_all(&dir).await?;

        let json = serde_json::to_vec_pretty(record)?;
        fs::write(dir.join(ARTICLE_FILE), json).await?;

        if let Some(jpeg) = image_jpeg {
            fs::write(dir.join(IMAGE_FILE), jpeg).await?;
        }

        info!(slug, image = image_jpeg.is_some(), "article persisted");
        Ok(())
    }
}

/// Read an article record back from its folder. Used by the summarize pass.
pub async fn read_article(dir: &Path) -> Result<ArticleRecord, StoreError> {
    let raw = fs::read(dir.join(ARTICLE_FILE)).await?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Write a summary record beside the article it summarizes.
pub async fn write_summary(
    dir: &Path,
    filename: &str,
    record: &SummaryRecord,
) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(record)?;
    fs::write(dir.join(filename), json).await?;
    Ok(())
}
