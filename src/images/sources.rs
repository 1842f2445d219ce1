//! Candidate gathering. Every source is consulted; nothing short-circuits,
//! because the best image is not always found by the same source across
//! sites.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use crate::config::ImageConfig;
use crate::images::{ImageCandidate, ImageSource};

/// Gather candidates in trust order. Relative URLs are resolved against the
/// page URL; unresolvable and non-HTTP URLs are dropped.
pub fn gather(document: &Html, base_url: &Url, config: &ImageConfig) -> Vec<ImageCandidate> {
    let mut candidates = Vec::new();

    if let Some(url) = structured_metadata_image(document, base_url) {
        candidates.push(candidate(url, ImageSource::StructuredMetadata, None, None));
    }
    if let Some(url) = in_content_image(document, base_url) {
        candidates.push(candidate(url, ImageSource::FallbackLibrary, None, None));
    }
    if let Some((url, width, height)) = og_image(document, base_url) {
        candidates.push(candidate(url, ImageSource::OgTag, width, height));
    }
    if let Some(url) = twitter_image(document, base_url) {
        candidates.push(candidate(url, ImageSource::TwitterCard, None, None));
    }
    candidates.extend(inline_images(document, base_url, config));

    candidates
}

fn candidate(
    url: Url,
    source: ImageSource,
    width_px: Option<u32>,
    height_px: Option<u32>,
) -> ImageCandidate {
    ImageCandidate {
        url,
        source,
        width_px,
        height_px,
        score: 0,
    }
}

/// JSON-LD `NewsArticle`/`Article` image, the page's own structured claim
/// about its lead image.
fn structured_metadata_image(document: &Html, base_url: &Url) -> Option<Url> {
    let selector = Selector::parse("script[type='application/ld+json']").ok()?;
    for element in document.select(&selector) {
        let raw = element.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        // A page may carry a single object or a @graph array.
        let nodes: Vec<&Value> = match &value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(obj) => match obj.get("@graph") {
                Some(Value::Array(items)) => items.iter().collect(),
                _ => vec![&value],
            },
            _ => continue,
        };
        for node in nodes {
            if let Some(url) = json_ld_image(node, base_url) {
                return Some(url);
            }
        }
    }
    None
}

fn json_ld_image(node: &Value, base_url: &Url) -> Option<Url> {
    let image = node.get("image")?;
    let raw = match image {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first().and_then(|v| match v {
            Value::String(s) => Some(s.as_str()),
            Value::Object(_) => v.get("url").and_then(Value::as_str),
            _ => None,
        })?,
        Value::Object(_) => image.get("url").and_then(Value::as_str)?,
        _ => return None,
    };
    resolve(raw, base_url)
}

/// First image inside the article body containers, standing in for a parser
/// library's "top image" field.
fn in_content_image(document: &Html, base_url: &Url) -> Option<Url> {
    for container in ["article img", "main img", "[role='main'] img"] {
        if let Ok(selector) = Selector::parse(container) {
            for element in document.select(&selector) {
                if let Some(url) = img_src(&element, base_url) {
                    return Some(url);
                }
            }
        }
    }
    None
}

fn og_image(document: &Html, base_url: &Url) -> Option<(Url, Option<u32>, Option<u32>)> {
    let url = meta_content(document, "meta[property='og:image']")
        .and_then(|raw| resolve(&raw, base_url))?;
    // og pages often declare the card dimensions alongside.
    let width = meta_content(document, "meta[property='og:image:width']")
        .and_then(|w| w.parse().ok());
    let height = meta_content(document, "meta[property='og:image:height']")
        .and_then(|h| h.parse().ok());
    Some((url, width, height))
}

fn twitter_image(document: &Html, base_url: &Url) -> Option<Url> {
    meta_content(document, "meta[name='twitter:image']")
        .or_else(|| meta_content(document, "meta[name='twitter:image:src']"))
        .and_then(|raw| resolve(&raw, base_url))
}

/// Inline `<img>` tags with declared dimensions at or above the floor. Only
/// participates when enough sized images exist; a page with one or two is
/// too noisy a signal.
fn inline_images(document: &Html, base_url: &Url, config: &ImageConfig) -> Vec<ImageCandidate> {
    let Ok(selector) = Selector::parse("img[width][height]") else {
        return Vec::new();
    };

    let mut sized = Vec::new();
    for element in document.select(&selector) {
        let width: Option<u32> = element.value().attr("width").and_then(|w| w.parse().ok());
        let height: Option<u32> = element.value().attr("height").and_then(|h| h.parse().ok());
        let (Some(width), Some(height)) = (width, height) else {
            continue;
        };
        if width < config.min_width || height < config.min_height {
            continue;
        }
        if let Some(url) = img_src(&element, base_url) {
            sized.push(candidate(url, ImageSource::InlineImg, Some(width), Some(height)));
        }
    }

    if sized.len() >= config.inline_min_count {
        sized
    } else {
        Vec::new()
    }
}

fn img_src(element: &ElementRef, base_url: &Url) -> Option<Url> {
    element
        .value()
        .attr("src")
        .and_then(|src| resolve(src, base_url))
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

fn resolve(raw: &str, base_url: &Url) -> Option<Url> {
    let url = base_url.join(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
