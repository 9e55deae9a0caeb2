use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for cache operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Suffix of the scratch file a write goes through before it is renamed
const PARTIAL_SUFFIX: &str = ".part";

/// File-per-entry cache rooted at one directory
///
/// Distinct names map to distinct files, so concurrent writers of different
/// entries never contend and no locking is done.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Creates a store rooted at `root` (the directory need not exist yet)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Creates the cache root and any missing parents
    pub fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))
    }

    /// True iff a file named `name` exists under the root
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Writes `bytes` as the entry for `name`, replacing any previous content
    ///
    /// The bytes land in `<name>.part` first and are renamed into place, so a
    /// write cut short never leaves a file that the next run treats as cached.
    pub fn write(&self, name: &str, bytes: &[u8]) -> StorageResult<()> {
        let path = self.path_for(name);
        let temp_path = self.path_for(&format!("{}{}", name, PARTIAL_SUFFIX));

        let result = write_file(&temp_path, bytes)
            .and_then(|()| fs::rename(&temp_path, &path).map_err(|e| StorageError::io(&path, e)));

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Reads the entry for `name`
    pub fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(name);
        fs::read(&path).map_err(|e| StorageError::io(&path, e))
    }

    /// Names of all entries ending in `suffix`, sorted
    pub fn list(&self, suffix: &str) -> StorageResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| StorageError::io(&self.root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.root, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| StorageError::io(&entry.path(), e))?
                .is_file();
            if !is_file {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(suffix) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let mut file = fs::File::create(path).map_err(|e| StorageError::io(path, e))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|e| StorageError::io(path, e))
}
