//! Crawl outcome reporting

use crate::ShareError;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// What happened to one app during fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// A cache file already existed; no request was made
    Hit,
    /// The record was fetched and written
    Fetched {
        /// Size of the body written to disk
        bytes: usize,
    },
}

/// An app whose fetch or write failed
#[derive(Debug)]
pub struct TaskFailure {
    /// The app's identifier (slug)
    pub app: String,

    /// Why it failed
    pub error: ShareError,
}

/// Summary of one crawl run
#[derive(Debug)]
pub struct CrawlReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall time from start to the completion barrier
    pub duration: Duration,

    /// Whether the index page was downloaded (false: served from cache)
    pub index_fetched: bool,

    /// Links extracted from the index page, repeats included
    pub links_found: usize,

    /// Links dropped because their identifier was already scheduled
    pub duplicates: usize,

    /// Apps skipped because they were already cached
    pub cached: usize,

    /// Apps fetched and written this run
    pub fetched: usize,

    /// Apps that failed; they stay absent and are retried next run
    pub failures: Vec<TaskFailure>,
}

impl CrawlReport {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            duration: Duration::ZERO,
            index_fetched: false,
            links_found: 0,
            duplicates: 0,
            cached: 0,
            fetched: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, app: String, result: Result<CacheOutcome, ShareError>) {
        match result {
            Ok(CacheOutcome::Hit) => self.cached += 1,
            Ok(CacheOutcome::Fetched { .. }) => self.fetched += 1,
            Err(error) => self.failures.push(TaskFailure { app, error }),
        }
    }

    /// Number of distinct apps the run handled
    pub fn apps(&self) -> usize {
        self.cached + self.fetched + self.failures.len()
    }

    /// True when every app ended up cached
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Identifiers of the failed apps, sorted
    pub fn failed_apps(&self) -> Vec<&str> {
        let mut apps: Vec<&str> = self.failures.iter().map(|f| f.app.as_str()).collect();
        apps.sort_unstable();
        apps
    }

    /// Logs a one-line summary plus one line per failure
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished in {:?}: {} apps ({} cached, {} fetched, {} failed), {} duplicate links",
            self.duration,
            self.apps(),
            self.cached,
            self.fetched,
            self.failures.len(),
            self.duplicates
        );

        for failure in &self.failures {
            tracing::warn!("Not cached: {} ({})", failure.app, failure.error);
        }
    }
}
