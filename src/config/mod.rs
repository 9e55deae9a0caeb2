//! Configuration module for Share-Ratings
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so an empty file describes the stock crawl of
//! `https://share.oculusvr.com` into `./cache`.
//!
//! # Example
//!
//! ```no_run
//! use share_ratings::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("share.toml")).unwrap();
//! println!("Caching into: {}", config.cache.root.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AnalysisConfig, CacheConfig, Config, CrawlerConfig, ExtractionConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
