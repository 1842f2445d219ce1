//! Article authenticity scoring.
//!
//! No single signal separates an article from a listing page reliably:
//! titles lie, URL shapes vary by site, and length varies by genre. The
//! scorer adds up weak signals and accepts anything clearing a mid-range
//! threshold, recording every contribution so a surprising verdict can be
//! read back signal by signal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::classifier::UrlPatterns;
use crate::config::ScoringConfig;
use crate::extractor::ExtractedContent;

/// One signed contribution to the score, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReason {
    pub signal: String,
    pub delta: i32,
}

/// The accept/reject decision plus its confidence score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleVerdict {
    /// Clamped to [0, 100].
    pub score: u8,
    /// Always `score >= accept_threshold`.
    pub is_article: bool,
    pub reasons: Vec<ScoreReason>,
}

static CATEGORY_TITLE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "Latest News", "Top Stories", "More Headlines"
        r"(?i)^(latest|top|breaking|more|today's)\s+(news|stories|headlines|articles|videos)\b",
        // Bare section names
        r"(?i)^(news|sport|sports|politics|business|opinion|world|local|entertainment|technology|health|lifestyle)$",
        r"(?i)\b(category|archive|archives|index)\b",
        r"(?i)\bpage\s+\d+\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s").unwrap());

/// Pure, deterministic scorer. All magnitudes come from `ScoringConfig`; the
/// URL pattern sets are shared with the link classifier.
pub struct ArticleScorer {
    config: ScoringConfig,
    patterns: UrlPatterns,
}

impl ArticleScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            patterns: UrlPatterns::default(),
        }
    }

    pub fn with_patterns(config: ScoringConfig, patterns: UrlPatterns) -> Self {
        Self { config, patterns }
    }

    pub fn score(&self, content: &ExtractedContent, url: &Url) -> ArticleVerdict {
        let mut reasons = Vec::new();
        let mut total: i32 = 0;

        let mut apply = |signal: &str, delta: i32, reasons: &mut Vec<ScoreReason>| {
            if delta != 0 {
                reasons.push(ScoreReason {
                    signal: signal.to_string(),
                    delta,
                });
                total += delta;
            }
        };

        // URL shape: unlike the pre-filter this is one signal among several,
        // so both pattern sets contribute independently.
        if self.patterns.is_article_path(url) {
            apply("url_article_pattern", self.config.url_article_bonus, &mut reasons);
        }
        if self.patterns.is_listing_path(url) {
            apply(
                "url_listing_pattern",
                -self.config.url_listing_penalty,
                &mut reasons,
            );
        }

        if title_reads_like_category(&content.title) {
            apply(
                "category_title",
                -self.config.category_title_penalty,
                &mut reasons,
            );
        }

        apply(
            "body_length",
            self.length_bonus(content.word_count),
            &mut reasons,
        );
        apply(
            "list_markup",
            -self.list_penalty(&content.body_text),
            &mut reasons,
        );

        if content.author.is_some() {
            apply("author_present", self.config.author_bonus, &mut reasons);
        }
        if content.published_date.is_some() {
            apply(
                "published_date_present",
                self.config.published_date_bonus,
                &mut reasons,
            );
        }

        let score = total.clamp(0, 100) as u8;
        ArticleVerdict {
            score,
            is_article: score >= self.config.accept_threshold,
            reasons,
        }
    }

    /// Zero below the minimum, linear up to the saturation point, flat after.
    /// Length alone must never dominate the verdict.
    fn length_bonus(&self, word_count: usize) -> i32 {
        let min = self.config.length_min_words;
        let sat = self.config.length_saturation_words;
        if word_count <= min {
            return 0;
        }
        let fraction = ((word_count - min) as f64 / (sat - min) as f64).min(1.0);
        (fraction * self.config.length_bonus_max as f64).round() as i32
    }

    /// Penalty proportional to the fraction of body lines that resemble list
    /// items. Listing pages are mostly items; prose is mostly sentences.
    fn list_penalty(&self, body_text: &str) -> i32 {
        let lines: Vec<&str> = body_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return 0;
        }
        let item_like = lines.iter().filter(|line| line_is_item(line)).count();
        let fraction = item_like as f64 / lines.len() as f64;
        (fraction * self.config.list_penalty_max as f64).round() as i32
    }
}

fn title_reads_like_category(title: &str) -> bool {
    let title = title.trim();
    CATEGORY_TITLE.iter().any(|re| re.is_match(title))
}

fn line_is_item(line: &str) -> bool {
    if line.starts_with(['•', '*', '-', '–', '·']) || NUMBERED_ITEM.is_match(line) {
        return true;
    }
    // Plain-text extraction loses bullet glyphs, so short unterminated
    // fragments count as items too.
    let words = line.split_whitespace().count();
    words <= 6 && !line.ends_with(['.', '!', '?', ':', ';', ','])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::model::{Extraction, ExtractionMethod, PageMeta};

    fn content(
        title: &str,
        body: &str,
        author: Option<&str>,
        date: Option<&str>,
    ) -> ExtractedContent {
        ExtractedContent::new(
            Extraction {
                title: title.to_string(),
                body_text: body.to_string(),
            },
            PageMeta {
                author: author.map(String::from),
                published_date: date.map(String::from),
                description: None,
            },
            ExtractionMethod::Readability,
        )
    }

    fn prose(words: usize) -> String {
        // Sentences long enough that no line reads like a list item.
        let sentence = "The committee deliberated for several hours before reaching a decision.";
        let per = sentence.split_whitespace().count();
        std::iter::repeat(sentence)
            .take(words / per + 1)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn scorer() -> ArticleScorer {
        ArticleScorer::new(ScoringConfig::default())
    }

    #[test]
    fn listing_page_scores_low() {
        let url = Url::parse("https://example.com/news/latest").unwrap();
        let body = prose(40);
        let verdict = scorer().score(&content("Latest News", &body, None, None), &url);
        assert!(!verdict.is_article);
        assert!(verdict.score < 40);
        assert!(
            verdict
                .reasons
                .iter()
                .any(|r| r.signal == "category_title" && r.delta < 0)
        );
    }

    #[test]
    fn real_article_scores_high() {
        let url = Url::parse("https://example.com/article/city-council-vote").unwrap();
        let body = prose(650);
        let verdict = scorer().score(
            &content(
                "City Council Approves Budget",
                &body,
                Some("Jane Reporter"),
                Some("2024-03-14"),
            ),
            &url,
        );
        assert!(verdict.is_article);
        assert!(verdict.score >= 40);
        assert!(
            verdict
                .reasons
                .iter()
                .any(|r| r.signal == "url_article_pattern" && r.delta > 0)
        );
        assert!(
            verdict
                .reasons
                .iter()
                .any(|r| r.signal == "author_present")
        );
    }

    #[test]
    fn score_is_always_clamped_and_threshold_consistent() {
        let urls = [
            "https://example.com/tag/sports/latest",
            "https://example.com/article/one-big-story-today",
            "https://example.com/",
        ];
        let bodies = [prose(0), prose(40), prose(650), prose(5000)];
        for url in urls {
            let url = Url::parse(url).unwrap();
            for body in &bodies {
                for (author, date) in [(None, None), (Some("A"), Some("2024"))] {
                    let verdict =
                        scorer().score(&content("Some Title Here", body, author, date), &url);
                    assert!(verdict.score <= 100);
                    assert_eq!(verdict.is_article, verdict.score >= 40);
                }
            }
        }
    }

    #[test]
    fn length_bonus_saturates() {
        let s = scorer();
        assert_eq!(s.length_bonus(100), 0);
        assert_eq!(s.length_bonus(150), 0);
        let mid = s.length_bonus(475);
        assert!(mid > 0 && mid < 30);
        assert_eq!(s.length_bonus(800), 30);
        // Diminishing returns: a ten-times-longer body gains nothing more.
        assert_eq!(s.length_bonus(8000), 30);
    }

    #[test]
    fn list_heavy_body_is_penalized() {
        let listy = "Transit budget approved\nRiver cleanup volunteers\nSchool board results\nNext page\n";
        let verdict = scorer().score(
            &content("Some Page", listy, None, None),
            &Url::parse("https://example.com/x").unwrap(),
        );
        assert!(
            verdict
                .reasons
                .iter()
                .any(|r| r.signal == "list_markup" && r.delta < 0)
        );
    }

    #[test]
    fn metadata_bonus_applies() {
        let url = Url::parse("https://example.com/plain").unwrap();
        let body = prose(300);
        let without = scorer().score(&content("A Headline Of Note", &body, None, None), &url);
        let with = scorer().score(
            &content(
                "A Headline Of Note",
                &body,
                Some("Jane"),
                Some("2024-01-01"),
            ),
            &url,
        );
        assert_eq!(i32::from(with.score) - i32::from(without.score), 20);
    }

    #[test]
    fn reasons_sum_to_unclamped_score() {
        let url = Url::parse("https://example.com/article/a-big-vote-tonight").unwrap();
        let body = prose(650);
        let verdict = scorer().score(
            &content("A Big Vote Tonight", &body, Some("J"), Some("2024")),
            &url,
        );
        let sum: i32 = verdict.reasons.iter().map(|r| r.delta).sum();
        assert_eq!(verdict.score as i32, sum.clamp(0, 100));
    }
}
