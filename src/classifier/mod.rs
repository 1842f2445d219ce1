//! Cheap URL + anchor-text pre-filter for discovered links.
//!
//! This runs before any fetch, so it only gets to look at the link itself.
//! Listing patterns take precedence over article patterns: a false negative
//! costs nothing (the same URL is usually re-discovered through another
//! link), a false positive costs a full fetch, extraction and scoring cycle.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// A discovered hyperlink awaiting classification. Ephemeral; never
/// persisted.
#[derive(Debug, Clone)]
pub struct LinkCandidate {
    pub url: Url,
    pub anchor_text: String,
}

/// Default path patterns indicating an individual article.
const ARTICLE_PATTERNS: &[&str] = &[
    r"(?i)/(article|articles|story|stories|post|posts)/",
    // Dated paths: /2024/03/some-slug
    r"/20\d{2}/\d{1,2}(/\d{1,2})?/[^/]+",
    // Hyphenated slug in the final segment, the common headline-URL shape.
    r"/[a-z0-9]+(?:-[a-z0-9]+){2,}/?$",
];

/// Default path patterns indicating a listing or section page.
const LISTING_PATTERNS: &[&str] = &[
    r"(?i)/(tag|tags|category|categories|topic|topics|section|sections|author|authors|archive|archives|search)(/|$)",
    r"(?i)/page/\d+",
    r"(?i)/(latest|index|home|trending|popular)/?$",
];

/// Anchor texts that are navigation chrome rather than headlines.
static NAV_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(home|more|next|previous|prev|back|menu|read more|see all|view all|sign in|log in|subscribe)$")
        .unwrap()
});

/// The shared article/listing path pattern sets. The classifier uses them as
/// a hard gate; the authenticity scorer reuses them as one signal among
/// several.
#[derive(Debug)]
pub struct UrlPatterns {
    article: Vec<Regex>,
    listing: Vec<Regex>,
}

impl Default for UrlPatterns {
    fn default() -> Self {
        Self::new(ARTICLE_PATTERNS, LISTING_PATTERNS)
            .expect("default URL patterns must compile")
    }
}

impl UrlPatterns {
    pub fn new(article: &[&str], listing: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            article: article
                .iter()
                .map(|p| Regex::new(p))
                .collect::<Result<_, _>>()?,
            listing: listing
                .iter()
                .map(|p| Regex::new(p))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn is_article_path(&self, url: &Url) -> bool {
        let path = url.path();
        self.article.iter().any(|re| re.is_match(path))
    }

    pub fn is_listing_path(&self, url: &Url) -> bool {
        let path = url.path();
        self.listing.iter().any(|re| re.is_match(path))
    }
}

/// Decides whether a discovered link is worth fetching as an article
/// candidate.
#[derive(Debug, Default)]
pub struct LinkClassifier {
    patterns: UrlPatterns,
}

impl LinkClassifier {
    pub fn new(patterns: UrlPatterns) -> Self {
        Self { patterns }
    }

    /// No score here; this is a binary pre-filter upstream of the expensive
    /// scorer.
    pub fn likely_article(&self, candidate: &LinkCandidate) -> bool {
        // Listing evidence wins outright.
        if self.patterns.is_listing_path(&candidate.url) {
            return false;
        }
        let anchor = candidate.anchor_text.trim();
        if NAV_ANCHOR.is_match(anchor) {
            return false;
        }

        if self.patterns.is_article_path(&candidate.url) {
            return true;
        }

        // No path evidence either way: a headline-length anchor is the only
        // remaining hint that this is a story link.
        anchor.split_whitespace().count() >= 4
    }

    /// Raw-string entry point: malformed URLs are not-likely, never an error.
    pub fn likely_article_raw(&self, url: &str, anchor_text: &str) -> bool {
        match Url::parse(url) {
            Ok(url) => self.likely_article(&LinkCandidate {
                url,
                anchor_text: anchor_text.to_string(),
            }),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str, anchor: &str) -> LinkCandidate {
        LinkCandidate {
            url: Url::parse(url).unwrap(),
            anchor_text: anchor.to_string(),
        }
    }

    #[test]
    fn article_path_is_likely() {
        let classifier = LinkClassifier::default();
        assert!(classifier.likely_article(&candidate(
            "https://example.com/article/city-council-vote",
            "City Council Approves Budget"
        )));
        assert!(classifier.likely_article(&candidate(
            "https://example.com/2024/03/14/big-local-story",
            "Big Local Story"
        )));
    }

    #[test]
    fn listing_path_is_not_likely() {
        let classifier = LinkClassifier::default();
        assert!(!classifier.likely_article(&candidate("https://example.com/tag/politics", "Politics")));
        assert!(!classifier.likely_article(&candidate("https://example.com/page/3", "3")));
        assert!(!classifier.likely_article(&candidate("https://example.com/news/latest", "Latest News")));
    }

    #[test]
    fn listing_takes_precedence_over_article() {
        let classifier = LinkClassifier::default();
        // Both pattern sets match; listing must win.
        assert!(!classifier.likely_article(&candidate(
            "https://example.com/category/sports/big-win-over-rivals",
            "Big Win Over Rivals"
        )));
    }

    #[test]
    fn hyphenated_slug_counts_as_article() {
        let classifier = LinkClassifier::default();
        assert!(classifier.likely_article(&candidate(
            "https://example.com/mayor-announces-new-transit-plan",
            "Mayor Announces New Transit Plan"
        )));
    }

    #[test]
    fn nav_anchor_is_not_likely() {
        let classifier = LinkClassifier::default();
        assert!(!classifier.likely_article(&candidate("https://example.com/about", "Read more")));
        assert!(!classifier.likely_article(&candidate("https://example.com/foo", "Home")));
    }

    #[test]
    fn headline_anchor_rescues_neutral_path() {
        let classifier = LinkClassifier::default();
        assert!(classifier.likely_article(&candidate(
            "https://example.com/a7f3b2",
            "Mayor announces sweeping new transit plan"
        )));
        assert!(!classifier.likely_article(&candidate("https://example.com/a7f3b2", "Sports")));
    }

    #[test]
    fn malformed_url_is_rejected_not_an_error() {
        let classifier = LinkClassifier::default();
        assert!(!classifier.likely_article_raw("not a url", "Some Headline Text Here"));
        assert!(!classifier.likely_article_raw("", ""));
    }
}
