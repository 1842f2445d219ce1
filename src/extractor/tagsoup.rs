//! Last-resort strategy: whole-body text with the obvious chrome subtrees
//! removed. Exists purely as a recall backstop for markup the earlier
//! strategies cannot handle.

use kuchiki::traits::TendrilSink;
use url::Url;

use crate::extractor::model::Extraction;
use crate::extractor::strategy::ExtractionStrategy;

const NOISE_SELECTOR: &str = "script, style, noscript, nav, header, footer, aside, form";

pub struct TagSoupStrategy;

impl ExtractionStrategy for TagSoupStrategy {
    fn try_extract(&self, html: &str, _url: &Url) -> Option<Extraction> {
        let document = kuchiki::parse_html().one(html);

        if let Ok(noise) = document.select(NOISE_SELECTOR) {
            let nodes: Vec<_> = noise.collect();
            for node in nodes {
                node.as_node().detach();
            }
        }

        let title = document
            .select_first("title")
            .ok()
            .map(|node| node.text_contents().trim().to_string())
            .filter(|title| !title.is_empty())?;

        let body_text = document.select_first("body").ok()?.text_contents();
        if body_text.trim().is_empty() {
            return None;
        }

        Some(Extraction { title, body_text })
    }

    fn name(&self) -> &'static str {
        "tag_soup"
    }
}
