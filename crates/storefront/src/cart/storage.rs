//! Durable key-value storage for the cart.
//!
//! Values are whole strings keyed by name, read, overwritten and removed
//! synchronously. Encoding is left to the caller.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value string storage that survives restarts.
pub trait LocalStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the value cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be modified.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by one `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a reader never observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for storage. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
        move |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl LocalStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&path)(e)),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(Self::io_error(&self.dir))?;

        let path = self.path_for(key);
        let mut file = tempfile::NamedTempFile::new_in(&self.dir).map_err(Self::io_error(&self.dir))?;
        file.write_all(value.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(Self::io_error(file.path()))?;
        file.persist(&path)
            .map_err(|e| Self::io_error(&path)(e.error))?;

        debug!(path = %path.display(), bytes = value.len(), "storage record written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "storage record removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&path)(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load("cart").unwrap(), None);
        storage.save("cart", "[]").unwrap();
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("[]"));
        storage.remove("cart").unwrap();
        storage.remove("cart").unwrap();
        assert_eq!(storage.load("cart").unwrap(), None);
    }

    #[test]
    fn test_file_storage_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(root.path().join("nested/state"));

        assert_eq!(storage.load("cart").unwrap(), None);
        storage.save("cart", r#"[{"id":1}]"#).unwrap();

        let on_disk = std::fs::read_to_string(storage.path_for("cart")).unwrap();
        assert_eq!(on_disk, r#"[{"id":1}]"#);
    }

    #[test]
    fn test_file_storage_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(root.path());

        storage.save("cart", "first").unwrap();
        storage.save("cart", "second").unwrap();
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("second"));

        // Only the record itself remains, no temp files
        let entries = std::fs::read_dir(root.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_file_storage_remove_missing_is_ok() {
        let root = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(root.path());
        storage.remove("cart").unwrap();

        storage.save("cart", "x").unwrap();
        storage.remove("cart").unwrap();
        assert!(!storage.path_for("cart").exists());
    }
}
