pub mod metadata;
pub mod model;
pub mod readable;
pub mod semantic;
pub mod strategy;
pub mod tagsoup;

#[cfg(test)]
mod tests;

pub use model::{ExtractedContent, ExtractionMethod};
pub use strategy::ExtractionStrategy;

use scraper::Html;
use tracing::{debug, warn};

use crate::fetcher::types::FetchedPage;

/// Ordered extraction fallback chain.
///
/// The chain owns two policies and nothing else: the strategy order, and the
/// acceptance bar a result must meet before the chain stops. Strategy
/// internals stay behind the `ExtractionStrategy` trait. Earlier strategies
/// are preferred whenever they succeed; later ones are noisier backstops.
pub struct ExtractionChain {
    strategies: Vec<(ExtractionMethod, Box<dyn ExtractionStrategy>)>,
    min_words: usize,
}

impl ExtractionChain {
    /// The standard chain: readability, then semantic selectors, then tag
    /// soup.
    pub fn standard(min_words: usize) -> Self {
        Self {
            strategies: vec![
                (
                    ExtractionMethod::Readability,
                    Box::new(readable::ReadabilityStrategy),
                ),
                (
                    ExtractionMethod::Semantic,
                    Box::new(semantic::SemanticStrategy),
                ),
                (
                    ExtractionMethod::TagSoup,
                    Box::new(tagsoup::TagSoupStrategy),
                ),
            ],
            min_words,
        }
    }

    #[cfg(test)]
    pub fn with_strategies(
        strategies: Vec<(ExtractionMethod, Box<dyn ExtractionStrategy>)>,
        min_words: usize,
    ) -> Self {
        Self {
            strategies,
            min_words,
        }
    }

    /// Try each strategy in declared order and accept the first result that
    /// meets the minimum word count. `None` means every strategy failed the
    /// bar and the page is dropped.
    pub fn extract(&self, page: &FetchedPage) -> Option<ExtractedContent> {
        // Metadata comes from the page head and is the same whichever
        // strategy wins; recover it once.
        let meta = {
            let document = Html::parse_document(&page.html);
            metadata::extract_meta(&document)
        };

        for (method, strategy) in &self.strategies {
            match strategy.try_extract(&page.html, &page.url_final) {
                Some(extraction) => {
                    let content =
                        ExtractedContent::new(extraction, meta.clone(), *method);
                    if content.word_count >= self.min_words {
                        debug!(
                            method = strategy.name(),
                            words = content.word_count,
                            url = %page.url_final,
                            "extraction accepted"
                        );
                        return Some(content);
                    }
                    debug!(
                        method = strategy.name(),
                        words = content.word_count,
                        min = self.min_words,
                        "extraction below word threshold, trying next strategy"
                    );
                }
                None => {
                    debug!(method = strategy.name(), "strategy produced nothing");
                }
            }
        }

        warn!(url = %page.url_final, "all extraction strategies failed, dropping page");
        None
    }
}
