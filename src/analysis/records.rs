//! Cached app records

use crate::crawler::DETAIL_SUFFIX;
use crate::storage::CacheStore;
use crate::ShareError;
use serde::{Deserialize, Serialize};

/// One app's record as served by the structured-data endpoint
///
/// Missing fields decode as zero, unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareApp {
    pub name: String,

    /// Sum of user ratings (each vote counts 1 to 5, so 1..=5 × votes)
    #[serde(rename = "rating", alias = "userRating")]
    pub user_rating: u32,

    #[serde(rename = "comfortRating")]
    pub comfort: u32,

    #[serde(rename = "comfortVotes")]
    pub comfort_votes: u32,

    /// Number of user ratings
    #[serde(rename = "votes")]
    pub votes: u32,

    #[serde(rename = "fileDownloadsOculus")]
    pub downloads: u32,
}

impl ShareApp {
    /// Average user rating, `None` without votes
    pub fn rating_ratio(&self) -> Option<f32> {
        (self.votes > 0).then(|| self.user_rating as f32 / self.votes as f32)
    }

    /// Average comfort rating, `None` without comfort votes
    pub fn comfort_ratio(&self) -> Option<f32> {
        (self.comfort_votes > 0).then(|| self.comfort as f32 / self.comfort_votes as f32)
    }
}

/// Decodes every detail entry in the cache, in file-name order
///
/// The index page and any other file without the detail suffix is skipped. A
/// detail file that does not decode is an error naming that file.
pub fn load_apps(store: &CacheStore) -> Result<Vec<ShareApp>, ShareError> {
    let names = store.list(DETAIL_SUFFIX)?;
    let mut apps = Vec::with_capacity(names.len());

    for name in names {
        let bytes = store.read(&name)?;
        let app = serde_json::from_slice(&bytes).map_err(|source| ShareError::Json {
            path: store.path_for(&name),
            source,
        })?;
        apps.push(app);
    }

    tracing::debug!("Loaded {} app records from {}", apps.len(), store.root().display());
    Ok(apps)
}
