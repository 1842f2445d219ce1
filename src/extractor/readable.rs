//! Primary strategy: semantic boilerplate removal via the readability crate.
//!
//! Most accurate when it works; on unusual markup it can come back empty or
//! with a stub body, which is why the chain's word-count gate exists.

use readability::extractor;
use url::Url;

use crate::extractor::model::Extraction;
use crate::extractor::strategy::ExtractionStrategy;

pub struct ReadabilityStrategy;

impl ExtractionStrategy for ReadabilityStrategy {
    fn try_extract(&self, html: &str, url: &Url) -> Option<Extraction> {
        let article = extractor::extract(&mut html.as_bytes(), url).ok()?;
        if article.text.trim().is_empty() {
            return None;
        }
        Some(Extraction {
            title: article.title,
            body_text: article.text,
        })
    }

    fn name(&self) -> &'static str {
        "readability"
    }
}
