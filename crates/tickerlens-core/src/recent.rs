//! Persisted list of recent successful search queries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::normalize_query;
use crate::StorageError;

pub const RECENT_SEARCHES_KEY: &str = "tickerlens.recent_searches";
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Durable string key-value storage.
pub trait KeyValueStorage: Send + Sync + std::fmt::Debug {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Default data directory: `<platform data dir>/tickerlens`.
pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tickerlens"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        // temp file + rename keeps readers from ever seeing a partial write
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;

        tracing::debug!(path = %path.display(), "saved storage entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Process-local storage, for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Most-recent-first list of distinct queries, capped at
/// [`MAX_RECENT_SEARCHES`]. Every mutation is written through immediately.
#[derive(Debug, Clone)]
pub struct RecentSearchStore {
    storage: Arc<dyn KeyValueStorage>,
    entries: Arc<Mutex<Vec<String>>>,
}

impl RecentSearchStore {
    /// Load the persisted list. Missing or corrupt data starts empty.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let entries = match storage.load(RECENT_SEARCHES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => normalize(list),
                Err(error) => {
                    tracing::warn!(error = %error, "discarding corrupt recent search list");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(error = %error, "failed to read recent search list");
                Vec::new()
            }
        };

        Self {
            storage,
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()))
    }

    pub fn list(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Move the normalized `query` to the front. Blank queries are ignored.
    pub fn record(&self, query: &str) -> Result<Vec<String>, StorageError> {
        let query = normalize_query(query);
        if query.is_empty() {
            return Ok(self.list());
        }

        self.mutate(|entries| {
            entries.retain(|entry| *entry != query);
            entries.insert(0, query);
            entries.truncate(MAX_RECENT_SEARCHES);
        })
    }

    pub fn remove(&self, query: &str) -> Result<Vec<String>, StorageError> {
        let query = normalize_query(query);
        self.mutate(|entries| entries.retain(|entry| *entry != query))
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        self.storage.remove(RECENT_SEARCHES_KEY)?;
        entries.clear();
        Ok(())
    }

    // The in-memory list only changes once the new list is saved.
    fn mutate(&self, change: impl FnOnce(&mut Vec<String>)) -> Result<Vec<String>, StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        change(&mut next);
        let raw = serde_json::to_string(&next)?;
        self.storage.save(RECENT_SEARCHES_KEY, &raw)?;
        *entries = next.clone();
        Ok(next)
    }
}

fn normalize(list: Vec<String>) -> Vec<String> {
    let mut entries: Vec<String> = Vec::with_capacity(MAX_RECENT_SEARCHES);
    for entry in list {
        let entry = normalize_query(&entry);
        if entry.is_empty() || entries.contains(&entry) {
            continue;
        }
        entries.push(entry);
        if entries.len() == MAX_RECENT_SEARCHES {
            break;
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_moves_to_front() {
        let store = RecentSearchStore::in_memory();
        store.record("apple").expect("save");
        store.record("tesla").expect("save");
        let list = store.record("apple").expect("save");

        assert_eq!(list, vec!["apple", "tesla"]);
    }

    #[test]
    fn whitespace_variants_share_one_entry() {
        let store = RecentSearchStore::in_memory();
        store.record("apple   inc").expect("save");
        let list = store.record(" apple inc\t").expect("save");

        assert_eq!(list, vec!["apple inc"]);
        assert!(store.remove("apple  inc").expect("remove").is_empty());
    }

    #[derive(Debug)]
    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some(r#"["tesla"]"#.to_owned()))
        }

        fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn failed_save_leaves_list_unchanged() {
        let store = RecentSearchStore::load(Arc::new(ReadOnlyStorage));

        assert!(store.record("apple").is_err());
        assert!(store.remove("tesla").is_err());
        assert!(store.clear().is_err());
        assert_eq!(store.list(), vec!["tesla"]);
    }

    #[test]
    fn blank_queries_are_ignored() {
        let store = RecentSearchStore::in_memory();
        store.record("   ").expect("save");
        assert!(store.list().is_empty());
    }

    #[test]
    fn list_is_capped_at_ten() {
        let store = RecentSearchStore::in_memory();
        for index in 0..15 {
            store.record(&format!("query {index}")).expect("save");
        }

        let list = store.list();
        assert_eq!(list.len(), MAX_RECENT_SEARCHES);
        assert_eq!(list[0], "query 14");
        assert_eq!(list[9], "query 5");
    }

    #[test]
    fn corrupt_payload_loads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save(RECENT_SEARCHES_KEY, "{not json").expect("save");

        let store = RecentSearchStore::load(storage);
        assert!(store.list().is_empty());
    }

    #[test]
    fn loaded_list_is_normalized() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .save(RECENT_SEARCHES_KEY, r#"[" msft ", "msft", "", "aapl"]"#)
            .expect("save");

        assert_eq!(RecentSearchStore::load(storage).list(), vec!["msft", "aapl"]);
    }

    #[test]
    fn file_storage_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Arc::new(FileStorage::new(dir.path().join("nested")));

        let store = RecentSearchStore::load(storage.clone());
        store.record("nvidia").expect("save");
        store.record("amd").expect("save");

        let reloaded = RecentSearchStore::load(storage.clone());
        assert_eq!(reloaded.list(), vec!["amd", "nvidia"]);
        assert!(!dir.path().join("nested").join("tickerlens.recent_searches.json.tmp").exists());

        reloaded.clear().expect("clear");
        assert_eq!(storage.load(RECENT_SEARCHES_KEY).expect("load"), None);
    }
}
