//! Crawler coordinator - bootstrap then fan-out
//!
//! A run has two phases and keeps no state of its own beyond the cache files:
//!
//! 1. Bootstrap: make sure the index page is cached, then read it back and
//!    turn its links into app identifiers. Any failure here is fatal, because
//!    nothing can be scheduled without a cached, parseable index.
//! 2. Fan-out: one task per app. Each task checks the cache and, on a miss,
//!    fetches the record from the structured-data endpoint and writes it.
//!    Failures stay inside their task. The run returns only after every task
//!    has finished.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::identifier::AppId;
use crate::crawler::parser::{parse_index, LinkMultiplicity};
use crate::crawler::report::{CacheOutcome, CrawlReport};
use crate::crawler::scheduler::FetchLimiter;
use crate::storage::CacheStore;
use crate::ShareError;
use chrono::Utc;
use std::collections::HashSet;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Main crawler coordinator structure
#[derive(Debug, Clone)]
pub struct Coordinator {
    fetcher: Fetcher,
    store: CacheStore,
    index_path: String,
    index_file: String,
    marker_class: String,
    multiplicity: LinkMultiplicity,
    force_refresh: bool,
    limiter: FetchLimiter,
}

/// Links pulled from the index page, reduced to distinct apps
#[derive(Debug)]
struct Discovery {
    links_found: usize,
    apps: Vec<AppId>,
    duplicates: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ShareError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, ShareError> {
        let fetcher = Fetcher::from_config(&config.crawler, &config.user_agent)?;

        Ok(Self {
            fetcher,
            store: CacheStore::new(&config.cache.root),
            index_path: config.crawler.index_path.clone(),
            index_file: config.cache.index_file.clone(),
            marker_class: config.extraction.marker_class.clone(),
            multiplicity: config.extraction.link_multiplicity,
            force_refresh: config.crawler.force_refresh,
            limiter: FetchLimiter::new(config.crawler.max_concurrent_fetches),
        })
    }

    /// Overrides the configured forced-refresh flag
    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    /// Runs both phases and reports per-app outcomes
    ///
    /// # Errors
    ///
    /// Only bootstrap failures are returned: the index page could not be
    /// fetched, written, read or parsed, or one of its links is not an
    /// `/app/<slug>` link. In that case no app task has been started.
    pub async fn run(&self) -> Result<CrawlReport, ShareError> {
        let start = Instant::now();
        let mut report = CrawlReport::new(Utc::now());

        tracing::info!(
            "Starting crawl of {} into {}",
            self.fetcher.origin(),
            self.store.root().display()
        );
        if self.force_refresh {
            tracing::info!("Forced refresh: cached entries will be fetched again");
        }

        report.index_fetched = self.ensure_index().await?;

        let discovery = self.discover().await?;
        report.links_found = discovery.links_found;
        report.duplicates = discovery.duplicates;

        tracing::info!(
            "Scheduling {} apps ({} links, {} duplicates, concurrency {})",
            discovery.apps.len(),
            discovery.links_found,
            discovery.duplicates,
            self.limiter
                .limit()
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        self.fan_out(discovery.apps, &mut report).await;

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Makes sure the index page is cached; returns whether it was downloaded
    async fn ensure_index(&self) -> Result<bool, ShareError> {
        let store = self.store.clone();
        blocking(move || store.ensure_root()).await??;

        if !self.force_refresh && entry_exists(&self.store, &self.index_file).await? {
            tracing::debug!("Index page already cached as {}", self.index_file);
            return Ok(false);
        }

        tracing::info!("Fetching index page {}", self.index_path);
        let body = self.fetcher.fetch(&self.index_path).await?;
        write_entry(self.store.clone(), self.index_file.clone(), body).await?;
        Ok(true)
    }

    /// Reads the cached index page and derives one identifier per app
    async fn discover(&self) -> Result<Discovery, ShareError> {
        let bytes = read_entry(&self.store, &self.index_file).await?;
        let page = parse_index(&self.index_file, &bytes, &self.marker_class, self.multiplicity);

        tracing::info!(
            "Parsed index page{} with {} app links",
            page.title
                .as_deref()
                .map(|t| format!(" '{}'", t))
                .unwrap_or_default(),
            page.links.len()
        );

        let mut seen = HashSet::new();
        let mut apps = Vec::new();
        let mut duplicates = 0;

        for link in &page.links {
            let app = AppId::from_link(link)?;
            if seen.insert(app.as_str().to_string()) {
                apps.push(app);
            } else {
                duplicates += 1;
            }
        }

        Ok(Discovery {
            links_found: page.links.len(),
            apps,
            duplicates,
        })
    }

    /// Spawns one task per app and waits for all of them
    async fn fan_out(&self, apps: Vec<AppId>, report: &mut CrawlReport) {
        let handles: Vec<(AppId, JoinHandle<Result<CacheOutcome, ShareError>>)> = apps
            .into_iter()
            .map(|app| {
                let task = cache_app(
                    self.fetcher.clone(),
                    self.store.clone(),
                    self.limiter.clone(),
                    self.force_refresh,
                    app.clone(),
                );
                (app, tokio::spawn(task))
            })
            .collect();

        // Completion barrier: every handle is awaited whatever the others did.
        for (app, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ShareError::Task(e.to_string())),
            };

            if let Err(e) = &result {
                tracing::warn!("Failed to cache {}: {}", app, e);
            }
            report.record(app.as_str().to_string(), result);
        }
    }
}

/// Ensures one app's record is cached
async fn cache_app(
    fetcher: Fetcher,
    store: CacheStore,
    limiter: FetchLimiter,
    force_refresh: bool,
    app: AppId,
) -> Result<CacheOutcome, ShareError> {
    let name = app.cache_file();
    if !force_refresh && entry_exists(&store, &name).await? {
        tracing::debug!("{} already cached", app);
        return Ok(CacheOutcome::Hit);
    }

    let _permit = limiter.acquire().await;
    let body = fetcher.fetch(&app.api_path()).await?;
    let bytes = body.len();
    write_entry(store, name, body).await?;

    Ok(CacheOutcome::Fetched { bytes })
}

/// Runs a cache operation on the blocking pool
async fn blocking<T, F>(op: F) -> Result<T, ShareError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ShareError::Task(e.to_string()))
}

async fn entry_exists(store: &CacheStore, name: &str) -> Result<bool, ShareError> {
    let (store, name) = (store.clone(), name.to_string());
    blocking(move || store.exists(&name)).await
}

async fn read_entry(store: &CacheStore, name: &str) -> Result<Vec<u8>, ShareError> {
    let (store, name) = (store.clone(), name.to_string());
    Ok(blocking(move || store.read(&name)).await??)
}

async fn write_entry(store: CacheStore, name: String, body: Vec<u8>) -> Result<(), ShareError> {
    blocking(move || store.write(&name, &body)).await??;
    Ok(())
}

/// Runs a crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use share_ratings::config::load_config;
/// use share_ratings::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("share.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} apps cached", report.cached + report.fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, ShareError> {
    Coordinator::new(config)?.run().await
}
