//! Configuration handling for the pipeline.
//!
//! Every threshold, bonus and penalty used by the scorer, the image pipeline
//! and the summarizer lives here rather than being scattered through the
//! modules that consume them. The defaults are the empirically tuned values
//! the pipeline shipped with; `Config::from_env` lets any of them be
//! overridden through the environment, and `validate` rejects combinations
//! that would make a run meaningless before any fetch happens.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable names. Public so tests and deployment tooling can
/// refer to them.
pub const ENV_OUTPUT_DIR: &str = "NEWSCLIP_OUTPUT_DIR";
pub const ENV_MAX_ARTICLES: &str = "NEWSCLIP_MAX_ARTICLES";
pub const ENV_ACCEPT_THRESHOLD: &str = "NEWSCLIP_ACCEPT_THRESHOLD";
pub const ENV_MIN_EXTRACT_WORDS: &str = "NEWSCLIP_MIN_EXTRACT_WORDS";
pub const ENV_CHUNK_WORDS: &str = "NEWSCLIP_CHUNK_WORDS";
pub const ENV_REDUCE_WORDS: &str = "NEWSCLIP_REDUCE_WORDS";
pub const ENV_GLOBAL_CONCURRENCY: &str = "NEWSCLIP_GLOBAL_CONCURRENCY";
pub const ENV_PER_HOST_CONCURRENCY: &str = "NEWSCLIP_PER_HOST_CONCURRENCY";
pub const ENV_SUMMARIZER_ENDPOINT: &str = "NEWSCLIP_SUMMARIZER_ENDPOINT";
pub const ENV_CAPTIONER_ENDPOINT: &str = "NEWSCLIP_CAPTIONER_ENDPOINT";

const DEFAULT_OUTPUT_DIR: &str = "./sessions";
const DEFAULT_MAX_ARTICLES: usize = 10;

/// Tunables for the article authenticity scorer. All deltas are applied to a
/// neutral base of zero and the total is clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Bonus when the URL path matches article-like patterns.
    pub url_article_bonus: i32,
    /// Penalty when the URL path matches listing-like patterns.
    pub url_listing_penalty: i32,
    /// Penalty when the title reads like a section header.
    pub category_title_penalty: i32,
    /// Word count below which the length signal contributes nothing.
    pub length_min_words: usize,
    /// Word count at which the length bonus saturates.
    pub length_saturation_words: usize,
    /// Maximum length bonus, reached at saturation.
    pub length_bonus_max: i32,
    /// Maximum penalty for list-heavy bodies, reached when every line is a
    /// list item.
    pub list_penalty_max: i32,
    /// Bonus for a recovered author.
    pub author_bonus: i32,
    /// Bonus for a recovered publication date.
    pub published_date_bonus: i32,
    /// Scores at or above this are accepted as articles.
    pub accept_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            url_article_bonus: 15,
            url_listing_penalty: 25,
            category_title_penalty: 20,
            length_min_words: 150,
            length_saturation_words: 800,
            length_bonus_max: 30,
            list_penalty_max: 25,
            author_bonus: 10,
            published_date_bonus: 10,
            accept_threshold: 40,
        }
    }
}

/// Tunables for image candidate scoring and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub base_score: i32,
    pub structured_metadata_bonus: i32,
    pub fallback_library_bonus: i32,
    pub og_tag_bonus: i32,
    pub twitter_card_bonus: i32,
    pub inline_img_bonus: i32,
    /// Bonus for URL tokens suggesting a hero/featured image.
    pub hero_token_bonus: i32,
    /// Penalty for URL tokens suggesting page chrome. Must outweigh every
    /// source bonus so chrome never wins on source trust alone.
    pub chrome_token_penalty: i32,
    /// Candidates with declared dimensions below these are discarded; the
    /// same floor is enforced again after decoding.
    pub min_width: u32,
    pub min_height: u32,
    /// Minimum number of sized inline `<img>` tags before that source is
    /// considered at all.
    pub inline_min_count: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_score: 50,
            structured_metadata_bonus: 20,
            fallback_library_bonus: 15,
            og_tag_bonus: 12,
            twitter_card_bonus: 8,
            inline_img_bonus: 0,
            hero_token_bonus: 10,
            chrome_token_penalty: 40,
            min_width: 120,
            min_height: 120,
            inline_min_count: 3,
        }
    }
}

/// Tunables for the hierarchical summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryConfig {
    /// Maximum words per chunk handed to the model.
    pub chunk_words: usize,
    /// Maximum words requested from the model per chunk.
    pub reduce_words: usize,
    /// Slightly larger bound for the final pass over joined partials.
    pub final_reduce_words: usize,
    /// Words kept by the excerpt fallback.
    pub excerpt_words: usize,
    /// Hard cap on normalized input length, in characters.
    pub max_input_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            chunk_words: 900,
            reduce_words: 220,
            final_reduce_words: 240,
            excerpt_words: 60,
            max_input_chars: 250_000,
        }
    }
}

/// Tunables for crawl orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Global cap on in-flight fetches.
    pub global_concurrency: usize,
    /// Per-host cap; must not exceed the global cap.
    pub per_host_concurrency: usize,
    /// Randomized politeness delay bounds applied before each fetch.
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    /// Fetch attempts per candidate before it is dropped.
    pub max_fetch_attempts: u32,
    pub base_backoff_secs: u32,
    /// Independent timeouts for a fetch and a model invocation.
    pub fetch_timeout_secs: u64,
    pub model_timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            global_concurrency: 8,
            per_host_concurrency: 2,
            delay_min_ms: 500,
            delay_max_ms: 2_000,
            max_fetch_attempts: 3,
            base_backoff_secs: 2,
            fetch_timeout_secs: 45,
            model_timeout_secs: 120,
        }
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub max_articles: usize,
    /// Minimum extracted word count a strategy result must meet before the
    /// fallback chain accepts it.
    pub min_extract_words: usize,
    pub scoring: ScoringConfig,
    pub image: ImageConfig,
    pub summary: SummaryConfig,
    pub runner: RunnerConfig,
    /// Inference endpoints; absent means the summarize pass falls back to
    /// excerpts and skips captions.
    pub summarizer_endpoint: Option<String>,
    pub captioner_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_articles: DEFAULT_MAX_ARTICLES,
            min_extract_words: 50,
            scoring: ScoringConfig::default(),
            image: ImageConfig::default(),
            summary: SummaryConfig::default(),
            runner: RunnerConfig::default(),
            summarizer_endpoint: None,
            captioner_endpoint: None,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to defaults, then
    /// validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(dir) = env::var(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        config.max_articles = env_parse(ENV_MAX_ARTICLES, config.max_articles)?;
        config.min_extract_words = env_parse(ENV_MIN_EXTRACT_WORDS, config.min_extract_words)?;
        config.scoring.accept_threshold =
            env_parse(ENV_ACCEPT_THRESHOLD, config.scoring.accept_threshold)?;
        config.summary.chunk_words = env_parse(ENV_CHUNK_WORDS, config.summary.chunk_words)?;
        config.summary.reduce_words = env_parse(ENV_REDUCE_WORDS, config.summary.reduce_words)?;
        config.runner.global_concurrency =
            env_parse(ENV_GLOBAL_CONCURRENCY, config.runner.global_concurrency)?;
        config.runner.per_host_concurrency =
            env_parse(ENV_PER_HOST_CONCURRENCY, config.runner.per_host_concurrency)?;
        config.summarizer_endpoint = env::var(ENV_SUMMARIZER_ENDPOINT).ok();
        config.captioner_endpoint = env::var(ENV_CAPTIONER_ENDPOINT).ok();

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make a run meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_articles == 0 {
            return Err(ConfigError::invalid("max_articles", "must be at least 1"));
        }
        if self.scoring.accept_threshold == 0 || self.scoring.accept_threshold > 100 {
            return Err(ConfigError::invalid(
                "accept_threshold",
                "must be in 1..=100",
            ));
        }
        if self.scoring.length_min_words >= self.scoring.length_saturation_words {
            return Err(ConfigError::invalid(
                "length_min_words",
                "must be below length_saturation_words",
            ));
        }
        if self.summary.chunk_words == 0 {
            return Err(ConfigError::invalid("chunk_words", "must be nonzero"));
        }
        if self.summary.reduce_words >= self.summary.chunk_words {
            return Err(ConfigError::invalid(
                "reduce_words",
                "must be below chunk_words or reduction cannot converge",
            ));
        }
        if self.image.min_width == 0 || self.image.min_height == 0 {
            return Err(ConfigError::invalid(
                "min_width/min_height",
                "must be nonzero",
            ));
        }
        if self.runner.global_concurrency == 0 || self.runner.per_host_concurrency == 0 {
            return Err(ConfigError::invalid("concurrency", "must be at least 1"));
        }
        if self.runner.per_host_concurrency > self.runner.global_concurrency {
            return Err(ConfigError::invalid(
                "per_host_concurrency",
                "must not exceed global_concurrency",
            ));
        }
        if self.runner.delay_min_ms > self.runner.delay_max_ms {
            return Err(ConfigError::invalid(
                "delay_min_ms",
                "must not exceed delay_max_ms",
            ));
        }
        Ok(())
    }
}

fn env_parse<T: FromStr + Copy>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: key,
            reason: format!("could not parse {:?}", raw),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration. These are the only
/// run-halting errors in the crate besides a missing collaborator.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: &str) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.to_string(),
        }
    }
}
