//! Share-Ratings main entry point
//!
//! This is the command-line interface for the Share-Ratings crawler and
//! dataset builder.

use anyhow::Context;
use clap::Parser;
use share_ratings::analysis::{run_analysis, DatasetKind};
use share_ratings::config::{load_config_with_hash, Config};
use share_ratings::crawler::{Coordinator, DETAIL_SUFFIX};
use share_ratings::storage::CacheStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Share-Ratings: cache Oculus Share app records and correlate their ratings
///
/// The crawl reads the Share index page, finds every app link on it and
/// caches each app's JSON record. Anything already cached is left alone, so an
/// interrupted crawl is resumed by running it again.
#[derive(Parser, Debug)]
#[command(name = "share-ratings")]
#[command(version = "1.0.0")]
#[command(about = "Cache Oculus Share app records and correlate their ratings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fetch everything again, even entries that are already cached
    #[arg(long, conflicts_with_all = ["dry_run", "analyze"])]
    refresh: bool,

    /// Validate config and show the cache status without crawling
    #[arg(long, conflicts_with = "analyze")]
    dry_run: bool,

    /// Build a dataset from the cache instead of crawling
    #[arg(long, value_enum, value_name = "KIND")]
    analyze: Option<DatasetKind>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path).with_context(|| {
                format!("failed to load configuration from {}", path.display())
            })?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)
    } else if let Some(kind) = cli.analyze {
        handle_analyze(&config, kind)
    } else {
        handle_crawl(&config, cli.refresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("share_ratings=info,warn"),
            1 => EnvFilter::new("share_ratings=debug,info"),
            2 => EnvFilter::new("share_ratings=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective config and what is cached
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Share-Ratings Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Origin: {}", config.crawler.origin);
    println!("  Index path: {}", config.crawler.index_path);
    println!("  Force refresh: {}", config.crawler.force_refresh);
    match config.crawler.max_concurrent_fetches {
        Some(n) => println!("  Max concurrent fetches: {}", n),
        None => println!("  Max concurrent fetches: unbounded"),
    }
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nExtraction:");
    println!("  Marker class: {}", config.extraction.marker_class);
    println!("  Link multiplicity: {:?}", config.extraction.link_multiplicity);

    println!("\nAnalysis:");
    println!("  Frame-rate CSV: {}", config.analysis.fps_csv.display());
    println!("  Output directory: {}", config.analysis.output_dir.display());
    println!("  Min votes: {}", config.analysis.min_votes);
    println!("  Max frame rate: {}", config.analysis.max_framerate);

    let store = CacheStore::new(&config.cache.root);
    println!("\nCache: {}", store.root().display());
    if !store.root().is_dir() {
        println!("  (does not exist yet)");
    } else {
        let cached = store
            .list(DETAIL_SUFFIX)
            .context("failed to list cache entries")?;
        println!(
            "  Index page ({}): {}",
            config.cache.index_file,
            if store.exists(&config.cache.index_file) {
                "cached"
            } else {
                "missing"
            }
        );
        println!("  App records: {}", cached.len());
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --analyze mode: builds one dataset from the cache
fn handle_analyze(config: &Config, kind: DatasetKind) -> anyhow::Result<()> {
    let (path, dataset) =
        run_analysis(config, kind).with_context(|| format!("failed to build {} dataset", kind))?;

    println!(
        "✓ {} points written to {} (slope {:.4}, y intercept {:.4})",
        dataset.len(),
        path.display(),
        dataset.slope,
        dataset.y_intercept
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, refresh: bool) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)
        .context("failed to set up crawler")?
        .with_force_refresh(refresh || config.crawler.force_refresh);

    match coordinator.run().await {
        Ok(report) => {
            report.log_summary();
            if !report.is_complete() {
                tracing::warn!(
                    "{} apps are not cached; run again to retry them",
                    report.failures.len()
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("crawl failed")
        }
    }
}
