use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Which strategy in the fallback chain produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Readability,
    Semantic,
    TagSoup,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Readability => "readability",
            Self::Semantic => "semantic",
            Self::TagSoup => "tag_soup",
        }
    }
}

/// Title and body text recovered by a single strategy. Page-level metadata is
/// merged in by the chain, which sees the document once for all strategies.
#[derive(Debug)]
pub struct Extraction {
    pub title: String,
    pub body_text: String,
}

/// Metadata recovered from the page head, independent of which strategy won.
#[derive(Debug, Default, Clone)]
pub struct PageMeta {
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
}

/// Extracted article content plus recovered metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    pub body_text: String,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub extraction_method: ExtractionMethod,
    /// Whitespace-delimited token count of `body_text`.
    pub word_count: usize,
}

impl ExtractedContent {
    pub fn new(extraction: Extraction, meta: PageMeta, method: ExtractionMethod) -> Self {
        let body_text = normalize_whitespace(&extraction.body_text);
        let word_count = body_text.split_whitespace().count();
        Self {
            title: extraction.title.trim().to_string(),
            body_text,
            author: meta.author,
            published_date: meta.published_date,
            description: meta.description,
            extraction_method: method,
            word_count,
        }
    }
}

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Collapse runs of spaces/tabs and squeeze blank-line runs down to paragraph
/// breaks, preserving intentional line structure.
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.trim();
    let spaced = SPACE_RUNS.replace_all(text, " ");
    NEWLINE_RUNS.replace_all(&spaced, "\n\n").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_is_derived_from_body() {
        let content = ExtractedContent::new(
            Extraction {
                title: " Spaced Title ".to_string(),
                body_text: "one two  three\n\n\nfour".to_string(),
            },
            PageMeta::default(),
            ExtractionMethod::Semantic,
        );
        assert_eq!(content.title, "Spaced Title");
        assert_eq!(content.word_count, 4);
    }

    #[test]
    fn normalize_collapses_runs() {
        let text = "  Hello    world  \n\n\n  Test  ";
        assert_eq!(normalize_whitespace(text), "Hello world \n\n Test");
    }

    #[test]
    fn method_labels_are_stable() {
        assert_eq!(ExtractionMethod::Readability.as_str(), "readability");
        assert_eq!(ExtractionMethod::TagSoup.as_str(), "tag_soup");
    }
}
