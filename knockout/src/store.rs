//! Key-value storage for the roster text and team-mode flag.
//!
//! Core code never reaches for ambient storage. Callers hand a
//! [`RosterStore`] to the [`RosterEditor`](crate::roster::RosterEditor).

use log::debug;
use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Stored roster at {} is not valid JSON: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// String-keyed, string-valued storage.
pub trait RosterStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>>;

    fn save(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// Volatile store, for tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl RosterStore for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object on disk, rewritten on every save.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but can't be read or parsed
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        debug!("Opened roster store {} ({} key(s))", path.display(), values.len());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> StoreResult<()> {
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents =
            serde_json::to_string_pretty(&self.values).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        // The target is only ever replaced whole
        let tmp = self.tmp_path();
        fs::write(&tmp, contents).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            io_err(e)
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RosterStore for FileStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn scratch_path(name: &str) -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("knockout-store-{}-{n}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("missing").unwrap(), None);
        store.save("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileStore::open(scratch_path("absent.json")).unwrap();
        assert_eq!(store.load("tournament-players").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let path = scratch_path("roster.json");
        {
            let mut store = FileStore::open(&path).unwrap();
            store.save("tournament-players", "Ann\nBob").unwrap();
            store.save("tournament-team-mode", "true").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.load("tournament-players").unwrap().as_deref(),
            Some("Ann\nBob")
        );
        assert_eq!(
            reopened.load("tournament-team-mode").unwrap().as_deref(),
            Some("true")
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_save_replaces_file_whole() {
        let path = scratch_path("roster.json");
        let mut store = FileStore::open(&path).unwrap();
        store.save("tournament-players", "Ann\nBob\nCid").unwrap();
        store.save("tournament-players", "Ann").unwrap();

        assert!(path.exists());
        assert!(!store.tmp_path().exists());
        assert_eq!(store.tmp_path().file_name().unwrap(), "roster.json.tmp");

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.load("tournament-players").unwrap().as_deref(),
            Some("Ann")
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let path = scratch_path("garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
