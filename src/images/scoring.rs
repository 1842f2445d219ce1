//! Candidate scoring and dimension validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ImageConfig;
use crate::images::{ImageCandidate, ImageSource};

/// Tokens suggesting a hero/featured image.
const HERO_TOKENS: &[&str] = &["featured", "hero", "lead"];

/// Tokens suggesting page chrome. The penalty for these must exceed any
/// source bonus: excluding chrome is a hard goal, not a tie-break.
const CHROME_TOKENS: &[&str] = &[
    "logo", "icon", "avatar", "ad", "ads", "banner", "tracking", "pixel", "sprite", "favicon",
];

static URL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").unwrap());

pub fn score_candidate(config: &ImageConfig, candidate: &ImageCandidate) -> u8 {
    let mut score = config.base_score + source_bonus(config, candidate.source);

    let tokens = url_tokens(candidate.url.as_str());
    if tokens.iter().any(|t| HERO_TOKENS.contains(&t.as_str())) {
        score += config.hero_token_bonus;
    }
    if tokens.iter().any(|t| CHROME_TOKENS.contains(&t.as_str())) {
        score -= config.chrome_token_penalty;
    }

    score.clamp(0, 100) as u8
}

fn source_bonus(config: &ImageConfig, source: ImageSource) -> i32 {
    match source {
        ImageSource::StructuredMetadata => config.structured_metadata_bonus,
        ImageSource::FallbackLibrary => config.fallback_library_bonus,
        ImageSource::OgTag => config.og_tag_bonus,
        ImageSource::TwitterCard => config.twitter_card_bonus,
        ImageSource::InlineImg => config.inline_img_bonus,
    }
}

/// Declared-dimension floor. Candidates with unknown dimensions pass here;
/// the decoded image is checked again after download.
pub fn meets_dimension_floor(config: &ImageConfig, candidate: &ImageCandidate) -> bool {
    if let Some(width) = candidate.width_px {
        if width < config.min_width {
            return false;
        }
    }
    if let Some(height) = candidate.height_px {
        if height < config.min_height {
            return false;
        }
    }
    true
}

fn url_tokens(url: &str) -> Vec<String> {
    URL_TOKEN
        .find_iter(&url.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}
