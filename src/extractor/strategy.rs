use url::Url;

use crate::extractor::model::Extraction;

/// A single extraction capability. The chain owns ordering and acceptance;
/// strategies only know how to pull a title and body out of markup.
pub trait ExtractionStrategy: Send + Sync {
    /// Attempt extraction. `None` means this strategy found nothing usable;
    /// the chain moves on to the next one.
    fn try_extract(&self, html: &str, url: &Url) -> Option<Extraction>;

    /// Stable tag identifying the strategy in logs and records.
    fn name(&self) -> &'static str;
}
