//! Correlation datasets built from cached records
//!
//! Each dataset is a list of `[x, y]` points with the app name for every point
//! at the same index, plus the trend line fitted through the points.

use crate::analysis::fps::FpsRow;
use crate::analysis::records::ShareApp;
use crate::analysis::trend::{fit_trend_line, TrendLine};
use crate::ShareError;
use serde::Serialize;
use std::fmt;

/// The correlations that can be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DatasetKind {
    /// Frame rate (x) against average user rating (y)
    FramerateRating,
    /// Frame rate, clamped to the ceiling (x), against average comfort (y)
    FramerateComfort,
    /// Average user rating (x) against downloads (y)
    RatingDownloads,
    /// Average comfort (x) against average user rating (y)
    ComfortRating,
}

impl DatasetKind {
    /// Whether building this dataset needs the frame-rate CSV
    pub fn needs_fps(&self) -> bool {
        matches!(self, Self::FramerateRating | Self::FramerateComfort)
    }

    /// File name the dataset is exported under
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::FramerateRating => "framerate_rating.json",
            Self::FramerateComfort => "framerate_comfort.json",
            Self::RatingDownloads => "rating_downloads.json",
            Self::ComfortRating => "comfort_rating.json",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FramerateRating => "framerate-rating",
            Self::FramerateComfort => "framerate-comfort",
            Self::RatingDownloads => "rating-downloads",
            Self::ComfortRating => "comfort-rating",
        };
        f.write_str(name)
    }
}

/// Points of one correlation, exported as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub names: Vec<String>,
    pub data: Vec<[f32; 2]>,
    pub slope: f64,
    pub y_intercept: f64,
}

impl Dataset {
    fn push(&mut self, name: &str, x: f32, y: f32) {
        self.names.push(name.to_string());
        self.data.push([x, y]);
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no app qualified
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fits the trend line and stores it on the dataset
    ///
    /// # Errors
    ///
    /// `ShareError::Analysis` when the points do not determine a line.
    pub fn fit(&mut self) -> Result<TrendLine, ShareError> {
        let line = fit_trend_line(&self.data).ok_or_else(|| {
            ShareError::Analysis(format!(
                "cannot fit a trend line through {} points",
                self.data.len()
            ))
        })?;
        self.slope = line.slope;
        self.y_intercept = line.y_intercept;
        Ok(line)
    }
}

fn find_app<'a>(apps: &'a [ShareApp], name: &str) -> Option<&'a ShareApp> {
    let found = apps.iter().find(|app| app.name == name);
    if found.is_none() {
        tracing::debug!("No cached app named {}", name);
    }
    found
}

/// Frame rate against average user rating
///
/// Rows whose frame rate is above `max_framerate` are left out.
pub fn framerate_vs_rating(
    apps: &[ShareApp],
    rows: &[FpsRow],
    max_framerate: f32,
) -> Result<Dataset, ShareError> {
    let mut dataset = Dataset::default();

    for row in rows {
        let Some(app) = find_app(apps, &row.share_name) else {
            continue;
        };
        let Some(rating) = app.rating_ratio() else {
            continue;
        };

        let framerate = row.framerate()?;
        if framerate > max_framerate {
            tracing::info!("Skipping {} due to frame rate {}", app.name, framerate);
            continue;
        }

        dataset.push(&app.name, framerate, rating);
    }

    Ok(dataset)
}

/// Frame rate (clamped to `max_framerate`) against average comfort
pub fn framerate_vs_comfort(
    apps: &[ShareApp],
    rows: &[FpsRow],
    max_framerate: f32,
) -> Result<Dataset, ShareError> {
    let mut dataset = Dataset::default();

    for row in rows {
        let Some(app) = find_app(apps, &row.share_name) else {
            continue;
        };
        let Some(comfort) = app.comfort_ratio() else {
            continue;
        };

        let framerate = row.framerate()?.min(max_framerate);
        dataset.push(&app.name, framerate, comfort);
    }

    Ok(dataset)
}

/// Average user rating against downloads, for apps with more than `min_votes` votes
pub fn rating_vs_downloads(apps: &[ShareApp], min_votes: u32) -> Dataset {
    let mut dataset = Dataset::default();

    for app in apps.iter().filter(|app| app.votes > min_votes) {
        if let Some(rating) = app.rating_ratio() {
            dataset.push(&app.name, rating, app.downloads as f32);
        }
    }

    dataset
}

/// Average comfort against average user rating
///
/// Apps need more than `min_votes` user votes and more than `min_votes`
/// comfort votes.
pub fn comfort_vs_rating(apps: &[ShareApp], min_votes: u32) -> Dataset {
    let mut dataset = Dataset::default();

    for app in apps
        .iter()
        .filter(|app| app.votes > min_votes && app.comfort_votes > min_votes)
    {
        if let (Some(comfort), Some(rating)) = (app.comfort_ratio(), app.rating_ratio()) {
            dataset.push(&app.name, comfort, rating);
        }
    }

    dataset
}
