//! Memoized registry loads
//!
//! A registry is read at most once per path for the life of the cache. Both
//! outcomes are remembered: a failed load keeps failing without touching the
//! file again until the entry is invalidated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::LoadError;
use crate::loader::{load_with, LoadOptions};

/// Cached outcome of loading one path
pub type CachedLoad = Result<Arc<Dataset>, LoadError>;

static GLOBAL: Lazy<DatasetCache> = Lazy::new(DatasetCache::new);

/// Per-path memo of registry loads.
///
/// The lock is held across the load itself, so concurrent first access to a
/// path results in a single read.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, CachedLoad>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache
    pub fn global() -> &'static DatasetCache {
        &GLOBAL
    }

    /// Return the cached load for `path`, loading it on first access
    pub fn get_or_load(&self, path: impl AsRef<Path>, options: &LoadOptions) -> CachedLoad {
        let path = path.as_ref();
        let mut entries = self.lock();
        if let Some(cached) = entries.get(path) {
            debug!(path = %path.display(), "registry cache hit");
            return cached.clone();
        }
        let outcome = load_with(path, options).map(Arc::new);
        entries.insert(path.to_path_buf(), outcome.clone());
        outcome
    }

    /// Forget the entry for `path`; returns whether one existed
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        self.lock().remove(path.as_ref()).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, CachedLoad>> {
        // A panic while loading leaves the map itself consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cache_hit_returns_same_dataset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "رقم الهوية,الاسم\n1,Ahmad\n").unwrap();

        let cache = DatasetCache::new();
        let first = cache.get_or_load(&path, &LoadOptions::default()).unwrap();

        // Changing the file does not matter until the entry is invalidated
        fs::write(&path, "رقم الهوية,الاسم\n2,Omar\n").unwrap();
        let second = cache.get_or_load(&path, &LoadOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.find("1").is_some());

        assert!(cache.invalidate(&path));
        let third = cache.get_or_load(&path, &LoadOptions::default()).unwrap();
        assert!(third.find("2").is_some());
    }

    #[test]
    fn test_failure_is_memoized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let cache = DatasetCache::new();
        let first = cache.get_or_load(&path, &LoadOptions::default());
        assert!(matches!(first, Err(LoadError::Unreadable { .. })));

        // File appears, but the failure stays cached
        fs::write(&path, "رقم الهوية\n1\n").unwrap();
        let second = cache.get_or_load(&path, &LoadOptions::default());
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.get_or_load(&path, &LoadOptions::default()).is_ok());
    }
}
