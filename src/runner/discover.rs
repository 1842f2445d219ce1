//! Link discovery on a fetched page.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::classifier::LinkCandidate;
use crate::fetcher::types::FetchedPage;

/// Collect the page's hyperlinks as classification candidates: absolute
/// HTTP(S) URLs only, deduplicated, fragments stripped.
pub fn discover_links(page: &FetchedPage) -> Vec<LinkCandidate> {
    let document = Html::parse_document(&page.html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut url) = page.url_final.join(href.trim()) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }
        url.set_fragment(None);

        // Self-links carry no new content.
        if url == page.url_final {
            continue;
        }
        if !seen.insert(url.to_string()) {
            continue;
        }

        let anchor_text = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        candidates.push(LinkCandidate { url, anchor_text });
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Utc;
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use url::Url;

    fn page(html: &str) -> FetchedPage {
        FetchedPage {
            url_final: Url::parse("https://example.com/news").unwrap(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body_raw: Bytes::from(html.to_string()),
            html: html.to_string(),
            charset: "UTF-8".to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn resolves_dedupes_and_filters() {
        let html = r#"<html><body>
            <a href="/article/one-big-story">One  Big
              Story</a>
            <a href="/article/one-big-story#comments">One Big Story</a>
            <a href="https://other.com/article/elsewhere-entirely">Elsewhere</a>
            <a href="mailto:tips@example.com">Tips</a>
            <a href="javascript:void(0)">Menu</a>
            <a href="https://example.com/news">Self</a>
        </body></html>"#;

        let links = discover_links(&page(html));
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();

        assert_eq!(
            urls,
            vec![
                "https://example.com/article/one-big-story",
                "https://other.com/article/elsewhere-entirely",
            ]
        );
        assert_eq!(links[0].anchor_text, "One Big Story");
    }
}
