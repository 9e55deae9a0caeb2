//! Storage module for the on-disk cache
//!
//! The cache is a single flat directory: one `<slug>.json` per app plus the
//! raw index page under a reserved name. A file's existence is the only
//! record that an entry is present; nothing is kept in memory between checks.

mod cache;

pub use cache::{CacheStore, StorageError, StorageResult};
