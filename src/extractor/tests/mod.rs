use bytes::Bytes;
use chrono::Utc;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::fs;
use url::Url;

use crate::extractor::model::{Extraction, ExtractionMethod};
use crate::extractor::strategy::ExtractionStrategy;
use crate::extractor::ExtractionChain;
use crate::fetcher::types::FetchedPage;

fn page(html: String, url: &str) -> FetchedPage {
    FetchedPage {
        url_final: Url::parse(url).unwrap(),
        status: StatusCode::OK,
        headers: HeaderMap::new(),
        body_raw: Bytes::from(html.clone()),
        html,
        charset: "UTF-8".to_string(),
        fetched_at: Utc::now(),
    }
}

#[test]
fn extracts_article_fixture() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");
    let chain = ExtractionChain::standard(50);

    let content = chain
        .extract(&page(html, "https://example.com/article/transit-budget"))
        .expect("article fixture should extract");

    assert!(content.title.contains("City Council Approves Transit Budget"));
    assert!(content.body_text.contains("forty million dollars"));
    assert!(content.word_count > 200);
    assert_eq!(content.author.as_deref(), Some("Jane Reporter"));
    assert_eq!(
        content.published_date.as_deref(),
        Some("2024-03-14T09:00:00Z")
    );
    assert!(content.description.is_some());
}

#[test]
fn sparse_listing_fails_the_word_gate() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/listing.html")
        .expect("Failed to read test fixture");
    let chain = ExtractionChain::standard(50);

    // A link farm has too little prose for any strategy to clear the bar.
    assert!(
        chain
            .extract(&page(html, "https://example.com/news/latest"))
            .is_none()
    );
}

#[test]
fn malformed_html_does_not_panic() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content"
        .to_string();
    let chain = ExtractionChain::standard(5);

    if let Some(content) = chain.extract(&page(html, "https://example.com/broken")) {
        assert_eq!(content.title, "Broken");
    }
}

// --- chain-order tests with scripted strategies ---

struct FixedStrategy {
    name: &'static str,
    words: Option<usize>,
}

impl ExtractionStrategy for FixedStrategy {
    fn try_extract(&self, _html: &str, _url: &Url) -> Option<Extraction> {
        self.words.map(|n| Extraction {
            title: format!("{} title", self.name),
            body_text: "word ".repeat(n),
        })
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[test]
fn first_strategy_meeting_the_bar_wins() {
    let chain = ExtractionChain::with_strategies(
        vec![
            (
                ExtractionMethod::Readability,
                Box::new(FixedStrategy {
                    name: "fail",
                    words: None,
                }),
            ),
            (
                ExtractionMethod::Semantic,
                Box::new(FixedStrategy {
                    name: "sixty",
                    words: Some(60),
                }),
            ),
            (
                ExtractionMethod::TagSoup,
                Box::new(FixedStrategy {
                    name: "five-hundred",
                    words: Some(500),
                }),
            ),
        ],
        50,
    );

    let content = chain
        .extract(&page("<html></html>".to_string(), "https://example.com/x"))
        .unwrap();

    // The 60-word strategy clears MIN_WORDS first; the richer result behind
    // it must never be preferred.
    assert_eq!(content.extraction_method, ExtractionMethod::Semantic);
    assert_eq!(content.word_count, 60);
}

#[test]
fn below_bar_results_advance_the_chain() {
    let chain = ExtractionChain::with_strategies(
        vec![
            (
                ExtractionMethod::Readability,
                Box::new(FixedStrategy {
                    name: "stub",
                    words: Some(10),
                }),
            ),
            (
                ExtractionMethod::Semantic,
                Box::new(FixedStrategy {
                    name: "full",
                    words: Some(80),
                }),
            ),
        ],
        50,
    );

    let content = chain
        .extract(&page("<html></html>".to_string(), "https://example.com/x"))
        .unwrap();
    assert_eq!(content.extraction_method, ExtractionMethod::Semantic);
}

#[test]
fn all_strategies_failing_drops_the_page() {
    let chain = ExtractionChain::with_strategies(
        vec![(
            ExtractionMethod::Readability,
            Box::new(FixedStrategy {
                name: "fail",
                words: None,
            }),
        )],
        50,
    );

    assert!(
        chain
            .extract(&page("<html></html>".to_string(), "https://example.com/x"))
            .is_none()
    );
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn extract_never_panics(
            html in ".*",
            url in "https://[a-z]+\\.com/.*"
        ) {
            let chain = ExtractionChain::standard(50);
            let _ = chain.extract(&page(html, &url));
        }
    }
}
