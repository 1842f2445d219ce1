//! Image candidate pipeline: gather from every source, score, validate,
//! select, then download and normalize the winner.
//!
//! No source is trusted alone. Structured metadata is usually right when
//! present but often absent; social tags are common but point at share cards;
//! inline tags are plentiful and mostly chrome. So the pipeline gathers from
//! all of them and lets scoring sort it out. Image absence is an expected
//! outcome, never an error.

pub mod download;
pub mod scoring;
pub mod sources;

pub use download::{download_and_normalize, ImageError};

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ImageConfig;
use crate::fetcher::types::FetchedPage;

/// Where a candidate was found. Declaration order is the trust order used
/// both for score bonuses and for breaking score ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    StructuredMetadata,
    FallbackLibrary,
    OgTag,
    TwitterCard,
    InlineImg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub url: Url,
    pub source: ImageSource,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
    /// Clamped to [0, 100].
    pub score: u8,
}

/// Gather → score → validate → select.
pub struct ImagePipeline {
    config: ImageConfig,
}

impl ImagePipeline {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn select_image(&self, page: &FetchedPage) -> Option<ImageCandidate> {
        let document = Html::parse_document(&page.html);
        let mut candidates = sources::gather(&document, &page.url_final, &self.config);
        debug!(count = candidates.len(), url = %page.url_final, "image candidates gathered");

        for candidate in &mut candidates {
            candidate.score = scoring::score_candidate(&self.config, candidate);
        }
        candidates.retain(|c| scoring::meets_dimension_floor(&self.config, c));

        // Highest score wins; on a tie the earlier-gathered (more trusted)
        // source wins, which is the order `gather` already emits.
        let selected = candidates
            .into_iter()
            .fold(None::<ImageCandidate>, |best, candidate| match best {
                Some(best) if best.score >= candidate.score => Some(best),
                _ => Some(candidate),
            });

        if let Some(candidate) = &selected {
            debug!(url = %candidate.url, source = ?candidate.source, score = candidate.score, "image selected");
        }
        selected
    }
}
