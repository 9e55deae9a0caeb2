//! App identifiers and the paths derived from them
//!
//! Every app link on the index page has the form `/app/<slug>`. The slug is the
//! cache key; the JSON record for it lives at `/apps-url-map/<slug>` and is
//! cached as `<slug>.json`.

use crate::ShareError;
use std::fmt;

/// Prefix of every browsable app page
pub const DETAIL_PREFIX: &str = "/app/";

/// Prefix of the structured-data endpoint serving the same app
pub const API_PREFIX: &str = "/apps-url-map/";

/// Suffix of every detail cache file
pub const DETAIL_SUFFIX: &str = ".json";

/// A validated app link and the slug derived from it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppId {
    link: String,
    slug: String,
}

impl AppId {
    /// Derives the identifier from an `/app/<slug>` link
    ///
    /// Links without the prefix, with an empty slug, or with a slug containing
    /// a path separator are rejected instead of producing a malformed cache key.
    ///
    /// # Example
    ///
    /// ```
    /// use share_ratings::crawler::AppId;
    ///
    /// let id = AppId::from_link("/app/foobar").unwrap();
    /// assert_eq!(id.as_str(), "foobar");
    /// assert!(AppId::from_link("/category/all").is_err());
    /// ```
    pub fn from_link(link: &str) -> Result<Self, ShareError> {
        let invalid = || ShareError::InvalidLink {
            link: link.to_string(),
        };

        let slug = link.strip_prefix(DETAIL_PREFIX).ok_or_else(invalid)?;
        if slug.is_empty() || slug.contains('/') || slug.contains('\\') {
            return Err(invalid());
        }

        Ok(Self {
            link: link.to_string(),
            slug: slug.to_string(),
        })
    }

    /// The bare slug
    pub fn as_str(&self) -> &str {
        &self.slug
    }

    /// Path the record is fetched from (`/apps-url-map/<slug>`)
    pub fn api_path(&self) -> String {
        rewrite_detail_path(&self.link)
    }

    /// File name of the cache entry (`<slug>.json`)
    pub fn cache_file(&self) -> String {
        format!("{}{}", self.slug, DETAIL_SUFFIX)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slug)
    }
}

/// Rewrites a browsable app path to its structured-data counterpart
///
/// Only the leading `/app/` is replaced; any other path is returned as-is.
pub fn rewrite_detail_path(path: &str) -> String {
    match path.strip_prefix(DETAIL_PREFIX) {
        Some(rest) => format!("{}{}", API_PREFIX, rest),
        None => path.to_string(),
    }
}
