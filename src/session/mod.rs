//! Session assembly: article records, filesystem-safe identities, and the
//! persistence seam.

pub mod store;

pub use store::{ArticleStore, FsStore, StoreError};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extractor::model::ExtractionMethod;
use crate::extractor::ExtractedContent;
use crate::images::ImageCandidate;
use crate::scorer::{ArticleVerdict, ScoreReason};

const MAX_SLUG_LEN: usize = 200;

/// The per-article record persisted as `article.json`. Written once, never
/// mutated; re-runs create new records under a new session identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: Url,
    pub title: String,
    /// Article body text. The field is named `content` on disk, which is
    /// what downstream summarization reads.
    #[serde(rename = "content")]
    pub body_text: String,
    pub author: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub word_count: usize,
    pub extraction_method: ExtractionMethod,
    pub score: u8,
    pub score_reasons: Vec<ScoreReason>,
    pub image_url: Option<Url>,
    pub fetched_at: DateTime<Utc>,
}

impl ArticleRecord {
    /// Build a record from an accepted verdict. Returns `None` for rejected
    /// verdicts; a record must never exist for a page that failed the
    /// authenticity bar.
    pub fn from_accepted(
        url: Url,
        content: ExtractedContent,
        verdict: ArticleVerdict,
        image: Option<&ImageCandidate>,
        fetched_at: DateTime<Utc>,
    ) -> Option<Self> {
        if !verdict.is_article {
            return None;
        }
        Some(Self {
            url,
            title: content.title,
            body_text: content.body_text,
            author: content.author,
            date: content.published_date,
            description: content.description,
            word_count: content.word_count,
            extraction_method: content.extraction_method,
            score: verdict.score,
            score_reasons: verdict.reasons,
            image_url: image.map(|i| i.url.clone()),
            fetched_at,
        })
    }
}

/// Persisted summary document, one per article (and one per captioned
/// image).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub filename: String,
    pub summary_type: SummaryKind,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Text,
    Image,
}

/// Derives unique folder names for one session. Collisions within a run get
/// deterministic numeric suffixes; nothing is ever silently overwritten.
#[derive(Debug, Default)]
pub struct SessionAssembler {
    seen: HashMap<String, u32>,
}

impl SessionAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session identity for a run starting now.
    pub fn session_id(started_at: DateTime<Utc>) -> String {
        format!("session_{}", started_at.timestamp())
    }

    /// Slug for this title, unique within the session: `budget_vote`,
    /// then `budget_vote_2`, `budget_vote_3`, ...
    pub fn unique_slug(&mut self, title: &str) -> String {
        let base = slugify(title);
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{}_{}", base, count)
        }
    }
}

/// Lowercase, alphanumerics kept, everything else folded to single
/// underscores, capped in length. Empty titles get a stable placeholder.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut last_was_sep = true;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() {
        "article".to_string()
    } else {
        slug
    }
}
