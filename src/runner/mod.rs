//! Crawl orchestration.
//!
//! One runner drives one session: fetch the seed, discover and classify its
//! links, then push each surviving candidate through fetch → extract → score
//! → image selection → persistence under bounded concurrency. Per-article
//! failures are counted and skipped; the run itself only fails if the seed
//! cannot be fetched.

pub mod discover;
pub mod stats;

pub use stats::{RunStats, StatsSnapshot};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::classifier::{LinkCandidate, LinkClassifier};
use crate::config::Config;
use crate::extractor::ExtractionChain;
use crate::fetcher::{self, FetchError, FetchedPage};
use crate::images::{download_and_normalize, ImagePipeline};
use crate::scorer::ArticleScorer;
use crate::session::{ArticleRecord, ArticleStore, SessionAssembler};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("seed fetch failed: {0}")]
    Seed(#[from] FetchError),
}

/// End-of-run report. The run always completes with whatever it managed to
/// save; per-article failures show up in the stats, not as errors.
#[derive(Debug)]
pub struct RunReport {
    pub session_id: String,
    pub stats: StatsSnapshot,
}

pub struct CrawlRunner {
    config: Config,
    session_id: String,
    run_id: Uuid,
    classifier: LinkClassifier,
    chain: ExtractionChain,
    scorer: ArticleScorer,
    images: ImagePipeline,
    store: Arc<dyn ArticleStore>,
    assembler: Mutex<SessionAssembler>,
    stats: Arc<RunStats>,
    saved: AtomicUsize,
    global_permits: Arc<Semaphore>,
    host_permits: DashMap<String, Arc<Semaphore>>,
    cancel: CancellationToken,
}

impl CrawlRunner {
    pub fn new(
        config: Config,
        session_id: String,
        store: Arc<dyn ArticleStore>,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        let global_permits = Arc::new(Semaphore::new(config.runner.global_concurrency));
        Arc::new(Self {
            classifier: LinkClassifier::default(),
            chain: ExtractionChain::standard(config.min_extract_words),
            scorer: ArticleScorer::new(config.scoring.clone()),
            images: ImagePipeline::new(config.image.clone()),
            store,
            assembler: Mutex::new(SessionAssembler::new()),
            stats: Arc::new(RunStats::default()),
            saved: AtomicUsize::new(0),
            global_permits,
            host_permits: DashMap::new(),
            cancel,
            session_id,
            run_id: Uuid::new_v4(),
            config,
        })
    }

    pub fn stats(&self) -> Arc<RunStats> {
        self.stats.clone()
    }

    /// Crawl from the seed until `max_articles` are persisted, the candidate
    /// list runs out, or the run is cancelled.
    #[instrument(skip_all, fields(seed = %seed, session = %self.session_id, run_id = %self.run_id))]
    pub async fn run(self: Arc<Self>, seed: Url) -> Result<RunReport, RunError> {
        info!(max_articles = self.config.max_articles, "starting crawl");

        let seed_page = self.fetch_with_retry(&seed).await?;
        self.stats.page_fetched();

        let seed_host = seed_page.host().map(str::to_string);
        let candidates: Vec<LinkCandidate> = discover::discover_links(&seed_page)
            .into_iter()
            // Stay on the seed's site; off-site links are syndication chrome.
            .filter(|link| link.url.host_str() == seed_host.as_deref())
            .filter(|link| self.classifier.likely_article(link))
            .collect();
        drop(seed_page);

        info!(candidates = candidates.len(), "candidate links classified");

        let mut tasks = JoinSet::new();
        for candidate in candidates {
            let runner = self.clone();
            tasks.spawn(async move {
                runner.process_candidate(candidate).await;
            });
        }
        while tasks.join_next().await.is_some() {}

        let report = RunReport {
            session_id: self.session_id.clone(),
            stats: self.stats.snapshot(),
        };
        info!(stats = ?report.stats, "crawl finished");
        Ok(report)
    }

    fn enough_saved(&self) -> bool {
        self.saved.load(Ordering::SeqCst) >= self.config.max_articles
    }

    #[instrument(skip_all, fields(url = %candidate.url))]
    async fn process_candidate(&self, candidate: LinkCandidate) {
        if self.cancel.is_cancelled() || self.enough_saved() {
            return;
        }

        // Per-host cap below the global cap keeps any single site polite.
        let host = candidate.url.host_str().unwrap_or_default().to_string();
        let host_permits = self
            .host_permits
            .entry(host)
            .or_insert_with(|| {
                Arc::new(Semaphore::new(self.config.runner.per_host_concurrency))
            })
            .clone();
        let Ok(_host_permit) = host_permits.acquire_owned().await else {
            return;
        };
        let Ok(_global_permit) = self.global_permits.clone().acquire_owned().await else {
            return;
        };

        let delay = fetcher::politeness_delay(
            self.config.runner.delay_min_ms,
            self.config.runner.delay_max_ms,
        );
        tokio::select! {
            _ = self.cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        if self.enough_saved() {
            return;
        }

        let page = match self.fetch_with_retry(&candidate.url).await {
            Ok(page) => {
                self.stats.page_fetched();
                page
            }
            Err(FetchError::Cancelled) => return,
            Err(err) => {
                self.stats.fetch_failed();
                warn!(error = %err, "fetch failed, skipping candidate");
                return;
            }
        };

        let Some(content) = self.chain.extract(&page) else {
            self.stats.extraction_failed();
            return;
        };

        let verdict = self.scorer.score(&content, &page.url_final);
        if !verdict.is_article {
            self.stats.article_rejected();
            info!(
                score = verdict.score,
                title = %content.title,
                "rejected: below confidence threshold"
            );
            return;
        }
        self.stats.article_found();
        info!(score = verdict.score, title = %content.title, "article accepted");

        // Image selection is best-effort: any failure downgrades to
        // no-image, never fails the article.
        let selected = self.images.select_image(&page);
        let jpeg = match &selected {
            Some(image) => {
                match download_and_normalize(&image.url, &self.config.image).await {
                    Ok(bytes) => Some(bytes),
                    Err(err) => {
                        warn!(error = %err, image = %image.url, "image unusable, continuing without");
                        None
                    }
                }
            }
            None => None,
        };
        let image_ref = if jpeg.is_some() { selected.as_ref() } else { None };

        let slug = self
            .assembler
            .lock()
            .expect("assembler lock poisoned")
            .unique_slug(&content.title);

        let Some(record) = ArticleRecord::from_accepted(
            page.url_final.clone(),
            content,
            verdict,
            image_ref,
            page.fetched_at,
        ) else {
            return;
        };

        // Reserve a save slot; concurrent tasks may race past max otherwise.
        if self.saved.fetch_add(1, Ordering::SeqCst) >= self.config.max_articles {
            return;
        }

        match self
            .store
            .persist_article(&slug, &record, jpeg.as_deref())
            .await
        {
            Ok(()) => {
                self.stats.article_saved();
                if jpeg.is_some() {
                    self.stats.image_saved();
                }
            }
            Err(err) => {
                warn!(error = %err, slug, "persist failed");
            }
        }
    }

    /// Fetch with a per-attempt timeout and jittered backoff between
    /// retriable failures.
    async fn fetch_with_retry(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let per_attempt = Duration::from_secs(self.config.runner.fetch_timeout_secs);
        let mut attempt: u32 = 0;
        loop {
            let result = tokio::select! {
                _ = self.cancel.cancelled() => Err(FetchError::Cancelled),
                attempted = timeout(per_attempt, fetcher::fetch(url)) => match attempted {
                    Ok(inner) => inner,
                    Err(_) => Err(FetchError::Timeout),
                },
            };

            match result {
                Ok(page) => return Ok(page),
                Err(err)
                    if err.should_retry()
                        && attempt + 1 < self.config.runner.max_fetch_attempts =>
                {
                    attempt += 1;
                    let delay = fetcher::retry_delay(attempt, self.config.runner.base_backoff_secs);
                    debug!(error = %err, attempt, delay_secs = delay.as_secs(), "retrying fetch");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
