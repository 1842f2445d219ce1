//! Secondary strategy: semantic-container selectors.
//!
//! Noisier than readability but tolerant of markup readability chokes on.
//! Walks a fixed list of content containers and takes the first with a
//! substantial amount of text.

use scraper::{Html, Selector};
use url::Url;

use crate::extractor::model::Extraction;
use crate::extractor::strategy::ExtractionStrategy;

// Containers that hold the article body on most news templates, most
// specific first.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".article-body",
    ".entry-content",
    ".post-content",
    ".content",
    "#content",
    "#main",
];

const MIN_CONTAINER_CHARS: usize = 100;

pub struct SemanticStrategy;

impl ExtractionStrategy for SemanticStrategy {
    fn try_extract(&self, html: &str, _url: &Url) -> Option<Extraction> {
        let document = Html::parse_document(html);

        let title = extract_title(&document)?;
        let body_text = extract_body(&document)?;

        Some(Extraction { title, body_text })
    }

    fn name(&self) -> &'static str {
        "semantic"
    }
}

fn extract_title(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("meta[property='og:title']") {
        for element in document.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
    }

    for selector_str in ["title", "h1"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                let title = element.text().collect::<String>().trim().to_string();
                if !title.is_empty() {
                    return Some(title);
                }
            }
        }
    }

    None
}

fn extract_body(document: &Html) -> Option<String> {
    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                let text = element.text().collect::<String>();
                if text.trim().len() > MIN_CONTAINER_CHARS {
                    return Some(text);
                }
            }
        }
    }
    None
}
