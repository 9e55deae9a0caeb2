use crate::config::types::{
    AnalysisConfig, CacheConfig, Config, CrawlerConfig, ExtractionConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_cache_config(&config.cache)?;
    validate_extraction_config(&config.extraction)?;
    validate_analysis_config(&config.analysis)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_origin(&config.origin)?;

    if !config.index_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "index_path must start with '/', got '{}'",
            config.index_path
        )));
    }

    if config.max_concurrent_fetches == Some(0) {
        return Err(ConfigError::Validation(
            "max_concurrent_fetches must be >= 1 when set".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got request={}s connect={}s",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the remote origin: absolute http(s), nothing after the host but an optional '/'
fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    let url = Url::parse(origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", origin, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must use http or https",
            origin
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' has no host",
            origin
        )));
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must not carry a path, query or fragment",
            origin
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "cache root cannot be empty".to_string(),
        ));
    }

    let index_file = &config.index_file;
    if index_file.is_empty() {
        return Err(ConfigError::Validation(
            "index_file cannot be empty".to_string(),
        ));
    }

    if index_file.contains('/') || index_file.contains('\\') || index_file == ".." {
        return Err(ConfigError::Validation(format!(
            "index_file must be a bare file name, got '{}'",
            index_file
        )));
    }

    // Detail entries are `<slug>.json`; the index must never look like one.
    if index_file.ends_with(crate::crawler::DETAIL_SUFFIX) {
        return Err(ConfigError::Validation(format!(
            "index_file '{}' collides with detail entries ending in '{}'",
            index_file,
            crate::crawler::DETAIL_SUFFIX
        )));
    }

    Ok(())
}

/// Validates extraction configuration
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.marker_class.is_empty() || config.marker_class.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "marker_class must be a single non-empty token, got '{}'",
            config.marker_class
        )));
    }

    Ok(())
}

/// Validates analysis configuration
fn validate_analysis_config(config: &AnalysisConfig) -> Result<(), ConfigError> {
    if config.max_framerate.is_nan() || config.max_framerate <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "max_framerate must be > 0, got {}",
            config.max_framerate
        )));
    }

    Ok(())
}
