//! Measured frame rates, one game per CSV row
//!
//! Column 1 holds the game's name on Share (empty when it has no Share page)
//! and column 5 the measured frame rate. The first row is a header.

use crate::ShareError;
use std::io::Read;
use std::path::Path;

const SHARE_NAME_COLUMN: usize = 1;
const FRAMERATE_COLUMN: usize = 5;

/// A frame-rate measurement for a game that has a Share page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpsRow {
    /// 1-based CSV line, for error messages
    pub line: u64,

    /// Name matching `ShareApp::name`
    pub share_name: String,

    /// Unparsed frame rate; parsed only once the row is matched to an app
    pub framerate: String,
}

impl FpsRow {
    /// Parses the frame-rate column
    pub fn framerate(&self) -> Result<f32, ShareError> {
        self.framerate.trim().parse().map_err(|e| {
            ShareError::Analysis(format!(
                "line {}: invalid frame rate '{}' for {}: {}",
                self.line, self.framerate, self.share_name, e
            ))
        })
    }
}

/// Loads frame-rate rows from a CSV file
pub fn load_fps_rows(path: &Path) -> Result<Vec<FpsRow>, ShareError> {
    let file = std::fs::File::open(path)?;
    let rows = read_fps_rows(file)?;
    tracing::debug!("Loaded {} frame-rate rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Reads frame-rate rows from any CSV source, skipping games without a Share name
pub fn read_fps_rows<R: Read>(reader: R) -> Result<Vec<FpsRow>, ShareError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let share_name = record.get(SHARE_NAME_COLUMN).unwrap_or("").trim();
        if share_name.is_empty() {
            continue;
        }

        let framerate = record.get(FRAMERATE_COLUMN).ok_or_else(|| {
            ShareError::Analysis(format!(
                "line {}: {} has no frame rate column",
                line, share_name
            ))
        })?;

        rows.push(FpsRow {
            line,
            share_name: share_name.to_string(),
            framerate: framerate.to_string(),
        });
    }

    Ok(rows)
}
