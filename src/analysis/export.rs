use crate::analysis::datasets::Dataset;
use crate::ShareError;
use std::fs;
use std::path::Path;

/// Writes a dataset as compact JSON, creating parent directories
///
/// Output shape: `{"names": [...], "data": [[x, y], ...], "slope": f, "y_intercept": f}`
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<(), ShareError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec(dataset).map_err(|source| ShareError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json)?;

    tracing::info!("Wrote {} points to {}", dataset.len(), path.display());
    Ok(())
}
