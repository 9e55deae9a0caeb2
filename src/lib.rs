//! Share-Ratings: crawl-and-cache for Oculus Share app ratings
//!
//! This crate discovers app pages from the Oculus Share index, caches each
//! app's JSON record on disk (skipping anything already cached), and turns the
//! cached records into correlation datasets with a fitted trend line.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod storage;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Share-Ratings operations
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {path}: {source}")]
    Transport { path: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Expected link {link} to start with /app/")]
    InvalidLink { link: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Failed to decode {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Crawl task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShareError {
    /// Returns true for network-level failures (request build, send, body read)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Reqwest(_))
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Share-Ratings operations
pub type Result<T> = std::result::Result<T, ShareError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, LinkMultiplicity};
pub use storage::CacheStore;
