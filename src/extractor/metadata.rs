//! Page-head metadata recovery: author, publication date, description.
//!
//! Editorial pages usually declare these in meta tags; index pages usually
//! declare none of them, which is exactly what the authenticity scorer
//! exploits.

use scraper::{Html, Selector};

use crate::extractor::model::PageMeta;

pub fn extract_meta(document: &Html) -> PageMeta {
    PageMeta {
        author: extract_author(document),
        published_date: extract_published_date(document),
        description: extract_description(document),
    }
}

fn extract_author(document: &Html) -> Option<String> {
    if let Some(content) = meta_content(document, "meta[name='author']") {
        return Some(content);
    }
    if let Some(content) = meta_content(document, "meta[property='article:author']") {
        return Some(content);
    }

    // Byline elements as a last resort.
    for selector_str in ["[rel='author']", ".byline", ".author-name"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                let text = element.text().collect::<String>().trim().to_string();
                if !text.is_empty() && text.len() < 120 {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn extract_published_date(document: &Html) -> Option<String> {
    if let Some(content) = meta_content(document, "meta[property='article:published_time']") {
        return Some(content);
    }
    if let Some(content) = meta_content(document, "meta[name='date']") {
        return Some(content);
    }

    if let Ok(selector) = Selector::parse("time[datetime]") {
        if let Some(element) = document.select(&selector).next() {
            if let Some(datetime) = element.value().attr("datetime") {
                let datetime = datetime.trim();
                if !datetime.is_empty() {
                    return Some(datetime.to_string());
                }
            }
        }
    }
    None
}

fn extract_description(document: &Html) -> Option<String> {
    meta_content(document, "meta[property='og:description']")
        .or_else(|| meta_content(document, "meta[name='description']"))
}

fn meta_content(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    for element in document.select(&selector) {
        if let Some(content) = element.value().attr("content") {
            let content = content.trim();
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_meta_tags() {
        let html = r#"<html><head>
            <meta name="author" content="Jane Reporter">
            <meta property="article:published_time" content="2024-03-14T09:00:00Z">
            <meta property="og:description" content="A thing happened.">
        </head><body></body></html>"#;
        let document = Html::parse_document(html);
        let meta = extract_meta(&document);
        assert_eq!(meta.author.as_deref(), Some("Jane Reporter"));
        assert_eq!(
            meta.published_date.as_deref(),
            Some("2024-03-14T09:00:00Z")
        );
        assert_eq!(meta.description.as_deref(), Some("A thing happened."));
    }

    #[test]
    fn byline_and_time_element_fallbacks() {
        let html = r#"<html><body>
            <span class="byline">By John Q. Writer</span>
            <time datetime="2024-01-02">January 2</time>
        </body></html>"#;
        let document = Html::parse_document(html);
        let meta = extract_meta(&document);
        assert_eq!(meta.author.as_deref(), Some("By John Q. Writer"));
        assert_eq!(meta.published_date.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn bare_page_yields_nothing() {
        let document = Html::parse_document("<html><body><p>hi</p></body></html>");
        let meta = extract_meta(&document);
        assert!(meta.author.is_none());
        assert!(meta.published_date.is_none());
        assert!(meta.description.is_none());
    }
}
