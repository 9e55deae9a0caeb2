//! Crawler module for discovering and caching app records
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching against the Share origin
//! - Index page parsing and app link extraction
//! - App identifiers and path rewriting
//! - Optional concurrency limiting
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod identifier;
mod parser;
mod report;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, Fetcher};
pub use identifier::{rewrite_detail_path, AppId, API_PREFIX, DETAIL_PREFIX, DETAIL_SUFFIX};
pub use parser::{extract_links, extract_links_from, parse_index, IndexPage, LinkMultiplicity};
pub use report::{CacheOutcome, CrawlReport, TaskFailure};
pub use scheduler::FetchLimiter;
