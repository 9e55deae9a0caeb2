use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a cache directory can be traced back to the
/// configuration that filled it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::LinkMultiplicity;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
origin = "http://127.0.0.1:8080"
index-path = "/category/all"
force-refresh = true
max-concurrent-fetches = 8
request-timeout-secs = 5

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "2.0"
contact-url = "https://example.com/bot"

[cache]
root = "/tmp/share-cache"
index-file = "index.html"

[extraction]
marker-class = "nameWrap"
link-multiplicity = "per-child"

[analysis]
min-votes = 10
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.origin, "http://127.0.0.1:8080");
        assert!(config.crawler.force_refresh);
        assert_eq!(config.crawler.max_concurrent_fetches, Some(8));
        assert_eq!(config.crawler.request_timeout_secs, 5);
        assert_eq!(config.crawler.connect_timeout_secs, 10);
        assert_eq!(
            config.user_agent.header_value(),
            "TestCrawler/2.0 (+https://example.com/bot)"
        );
        assert_eq!(config.cache.index_file, "index.html");
        assert_eq!(
            config.extraction.link_multiplicity,
            LinkMultiplicity::PerChild
        );
        assert_eq!(config.analysis.min_votes, 10);
        assert_eq!(config.analysis.max_framerate, 200.0);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.origin, "https://share.oculusvr.com");
        assert_eq!(config.crawler.index_path, "/category/all");
        assert!(!config.crawler.force_refresh);
        assert_eq!(config.crawler.max_concurrent_fetches, None);
        assert_eq!(
            config.user_agent.header_value(),
            "twenty-milliseconds-bot/1.0"
        );
        assert_eq!(config.cache.root, std::path::PathBuf::from("cache"));
        assert_eq!(config.cache.index_file, "share_homepage.html");
        assert_eq!(config.extraction.marker_class, "nameWrap");
        assert_eq!(config.extraction.link_multiplicity, LinkMultiplicity::Once);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/share.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_multiplicity_is_rejected() {
        let result = parse_config("[extraction]\nlink-multiplicity = \"twice\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-concurrent-fetches = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
