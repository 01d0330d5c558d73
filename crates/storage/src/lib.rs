use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const RECORDS_KEY: &str = "finance-tracker:records";
pub const SETTINGS_KEY: &str = "finance-tracker:settings";
pub const THEME_KEY: &str = "finance-tracker:theme";
pub const SORT_KEY: &str = "finance-tracker:sort";

// --- Backend Adapter Pattern ---
pub type SharedStorage = Arc<dyn Storage>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value persistence, the shape of a browser's local storage.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Outcome of a mutation: the value produced in memory and whether the write-back succeeded.
///
/// The in-memory value stays authoritative either way; `saved == false` only tells the
/// caller that the change will not survive the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<T> {
    pub value: T,
    pub saved: bool,
}

impl<T> Persisted<T> {
    pub fn new(value: T, saved: bool) -> Self {
        Self { value, saved }
    }
}

pub fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.get_item(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, &raw)
}

/// One file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        tracing::debug!("File storage rooted at {}", root.display());
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        // Keys are namespaced with ':' which is not portable in file names.
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        Ok(self.root.join(format!("{}.json", file_name)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items()?.remove(key);
        Ok(())
    }
}

// do not add #[cfg(test)] here because it hides this method from libraries.
pub fn get_test_storage() -> SharedStorage {
    Arc::new(MemoryStorage::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), Some("v".to_string()));

        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();

        let first = FileStorage::new(dir.path()).unwrap();
        first.set_item(RECORDS_KEY, "[]").unwrap();

        let second = FileStorage::new(dir.path()).unwrap();
        assert_eq!(second.get_item(RECORDS_KEY).unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert_eq!(storage.get_item(THEME_KEY).unwrap(), None);
        // Removing an absent key is not an error.
        storage.remove_item(THEME_KEY).unwrap();
    }

    #[test]
    fn test_file_storage_rejects_empty_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(matches!(storage.set_item("", "x"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_json_helpers() {
        let storage = get_test_storage();
        save_json(storage.as_ref(), SORT_KEY, &vec![1, 2, 3]).unwrap();

        let loaded: Option<Vec<i32>> = load_json(storage.as_ref(), SORT_KEY).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        storage.set_item(SORT_KEY, "not json").unwrap();
        let broken: Result<Option<Vec<i32>>, _> = load_json(storage.as_ref(), SORT_KEY);
        assert!(matches!(broken, Err(StorageError::Serialization(_))));
    }
}
