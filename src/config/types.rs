use crate::crawler::LinkMultiplicity;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Share-Ratings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Scheme and host every path is appended to
    pub origin: String,

    /// Path of the index page listing every app
    pub index_path: String,

    /// Re-fetch everything even when a cache file exists
    pub force_refresh: bool,

    /// Upper bound on in-flight fetches; unbounded when absent
    pub max_concurrent_fetches: Option<u32>,

    /// Whole-request deadline (seconds)
    pub request_timeout_secs: u64,

    /// Connection establishment deadline (seconds)
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            origin: "https://share.oculusvr.com".to_string(),
            index_path: "/category/all".to_string(),
            force_refresh: false,
            max_concurrent_fetches: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "twenty-milliseconds-bot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
        }
    }
}

/// Cache directory configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Directory holding every cached file
    pub root: PathBuf,

    /// Reserved file name for the raw index page
    pub index_file: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("cache"),
            index_file: "share_homepage.html".to_string(),
        }
    }
}

/// Link extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionConfig {
    /// Class attribute value wrapping each app link
    pub marker_class: String,

    /// How often a marker's link is emitted
    pub link_multiplicity: LinkMultiplicity,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            marker_class: "nameWrap".to_string(),
            link_multiplicity: LinkMultiplicity::default(),
        }
    }
}

/// Dataset generation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    /// CSV of measured frame rates, one game per row
    pub fps_csv: PathBuf,

    /// Directory the dataset JSON files are written to
    pub output_dir: PathBuf,

    /// Apps with this many votes or fewer are left out of ratio datasets
    pub min_votes: u32,

    /// Frame-rate ceiling (skip or clamp, depending on the dataset)
    pub max_framerate: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fps_csv: PathBuf::from("static/csv/dk2_fps_names.csv"),
            output_dir: PathBuf::from("static/data/correlation-framerate"),
            min_votes: 5,
            max_framerate: 200.0,
        }
    }
}
