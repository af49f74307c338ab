//! Local persistent cache: the client-side key-value store
//!
//! Holds the student identifier hint and the legacy role flags. Nothing read
//! from here grants access on its own.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{GateError, Result};

/// Student identifier established by the student login step
pub const STUDENT_ID_KEY: &str = "student_logged_in_id";

/// Legacy flag written after a confirmed admin check
pub const ADMIN_FLAG_KEY: &str = "admin_logged_in";

/// Legacy flag written after a confirmed staff check
pub const STAFF_FLAG_KEY: &str = "staff_logged_in";

/// Synchronous key-value cache
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Cache persisted as a flat JSON object on disk.
///
/// The whole file is rewritten on every mutation.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileCache {
    /// Open the cache at `path`; a missing file is an empty cache
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                GateError::Cache(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "File cache opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        assert!(cache.get(STUDENT_ID_KEY).is_none());
        cache.set(STUDENT_ID_KEY, "S123").unwrap();
        assert_eq!(cache.get(STUDENT_ID_KEY).as_deref(), Some("S123"));
        cache.remove(STUDENT_ID_KEY).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_file_cache_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let cache = FileCache::open(&path).unwrap();
        cache.set(STUDENT_ID_KEY, "S9").unwrap();
        cache.set(ADMIN_FLAG_KEY, "true").unwrap();
        drop(cache);

        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(reopened.get(STUDENT_ID_KEY).as_deref(), Some("S9"));
        reopened.remove(STUDENT_ID_KEY).unwrap();

        let again = FileCache::open(&path).unwrap();
        assert!(again.get(STUDENT_ID_KEY).is_none());
        assert_eq!(again.get(ADMIN_FLAG_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn test_file_cache_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let err = FileCache::open(&path).unwrap_err();
        assert_eq!(err.kind(), "cache");
    }
}
