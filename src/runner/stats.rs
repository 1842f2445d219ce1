//! Per-run counters.
//!
//! One `RunStats` is created per run and threaded through explicitly, so
//! concurrent runs in the same process can never bleed into each other.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct RunStats {
    pages_fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    extraction_failures: AtomicUsize,
    articles_found: AtomicUsize,
    articles_rejected: AtomicUsize,
    articles_saved: AtomicUsize,
    images_saved: AtomicUsize,
}

/// Point-in-time copy of the counters, for logs and the end-of-run report.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub extraction_failures: usize,
    pub articles_found: usize,
    pub articles_rejected: usize,
    pub articles_saved: usize,
    pub images_saved: usize,
}

impl RunStats {
    pub fn page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn extraction_failed(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn article_found(&self) {
        self.articles_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn article_rejected(&self) {
        self.articles_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn article_saved(&self) {
        self.articles_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn image_saved(&self) {
        self.images_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            articles_found: self.articles_found.load(Ordering::Relaxed),
            articles_rejected: self.articles_rejected.load(Ordering::Relaxed),
            articles_saved: self.articles_saved.load(Ordering::Relaxed),
            images_saved: self.images_saved.load(Ordering::Relaxed),
        }
    }
}
