//! Analysis module for turning cached records into datasets
//!
//! This module handles:
//! - Loading the cached app records
//! - Loading measured frame rates from CSV
//! - Building correlation datasets and fitting trend lines
//! - Exporting datasets as JSON

mod datasets;
mod export;
mod fps;
mod records;
mod trend;

pub use datasets::{
    comfort_vs_rating, framerate_vs_comfort, framerate_vs_rating, rating_vs_downloads, Dataset,
    DatasetKind,
};
pub use export::write_dataset;
pub use fps::{load_fps_rows, read_fps_rows, FpsRow};
pub use records::{load_apps, ShareApp};
pub use trend::{fit_trend_line, TrendLine};

use crate::config::Config;
use crate::storage::CacheStore;
use crate::ShareError;
use std::path::PathBuf;

/// Builds one dataset from the cache
///
/// The frame-rate CSV is only read for the kinds that need it.
pub fn build_dataset(config: &Config, kind: DatasetKind) -> Result<Dataset, ShareError> {
    let store = CacheStore::new(&config.cache.root);
    let apps = load_apps(&store)?;
    tracing::info!("Loaded {} cached apps", apps.len());

    let analysis = &config.analysis;
    let mut dataset = if kind.needs_fps() {
        let rows = load_fps_rows(&analysis.fps_csv)?;
        match kind {
            DatasetKind::FramerateRating => {
                framerate_vs_rating(&apps, &rows, analysis.max_framerate)?
            }
            _ => framerate_vs_comfort(&apps, &rows, analysis.max_framerate)?,
        }
    } else {
        match kind {
            DatasetKind::RatingDownloads => rating_vs_downloads(&apps, analysis.min_votes),
            _ => comfort_vs_rating(&apps, analysis.min_votes),
        }
    };

    let line = dataset.fit()?;
    tracing::info!(
        "{}: {} points, slope {}, y intercept {}",
        kind,
        dataset.len(),
        line.slope,
        line.y_intercept
    );

    Ok(dataset)
}

/// Builds a dataset and writes it to the configured output directory
///
/// # Returns
///
/// The path of the written file together with the dataset.
pub fn run_analysis(config: &Config, kind: DatasetKind) -> Result<(PathBuf, Dataset), ShareError> {
    let dataset = build_dataset(config, kind)?;
    let path = config.analysis.output_dir.join(kind.file_name());
    write_dataset(&dataset, &path)?;
    Ok((path, dataset))
}
