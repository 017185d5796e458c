//! Durable key-value storage for the session marker.
//!
//! ARCHITECTURE
//! ============
//! `SecureStore` is the port; `FileSecureStore` keeps one owner-only file per
//! key under the app data directory, and `MemorySecureStore` backs tests and
//! ephemeral runs. Values are short UTF-8 strings.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store cannot be reached at all.
    #[error("secure storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data exists but cannot be decoded.
    #[error("secure storage data corrupt: {0}")]
    Corrupt(String),

    /// Any other read/write/delete failure.
    #[error("secure storage failed: {0}")]
    Other(String),
}

pub trait SecureStore: Send + Sync {
    /// Read `key`; `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FILE STORE
// =============================================================================

#[derive(Clone, Debug)]
pub struct FileSecureStore {
    base_dir: PathBuf,
}

impl FileSecureStore {
    /// Open (creating if needed) the store at `<data_dir>/secure`. The
    /// directory is restricted to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open_in(data_dir: &Path) -> Result<Self, io::Error> {
        let base_dir = data_dir.join("secure");
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
            builder.mode(0o700);
            builder.create(&base_dir)?;
            fs::set_permissions(&base_dir, fs::Permissions::from_mode(0o700))?;
        }
        #[cfg(not(unix))]
        builder.create(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Use `base_dir` as-is without creating it.
    #[must_use]
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.dat"))
    }

    fn map_io_error(context: &str, err: io::Error) -> StorageError {
        match err.kind() {
            io::ErrorKind::PermissionDenied => StorageError::Unavailable(format!("{context}: {err}")),
            _ => StorageError::Other(format!("{context}: {err}")),
        }
    }
}

impl SecureStore for FileSecureStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read(self.file_path(key)) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StorageError::Corrupt(format!("{key}: {e}"))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::map_io_error("failed to read secure storage file", err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.file_path(key);
        let temp_path = path.with_extension("tmp");
        // A leftover temp file may carry looser permissions; start fresh.
        match fs::remove_file(&temp_path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => {
                return Err(Self::map_io_error("failed to remove stale secure storage temp file", err));
            }
            _ => {}
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&temp_path)
            .map_err(|err| Self::map_io_error("failed to create secure storage temp file", err))?;
        file.write_all(value.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|err| Self::map_io_error("failed to write secure storage temp file", err))?;
        drop(file);

        fs::rename(&temp_path, &path).map_err(|err| Self::map_io_error("failed to rename secure storage file", err))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::map_io_error("failed to delete secure storage file", err)),
        }
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
pub struct MemorySecureStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySecureStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_owned()))
    }
}

impl SecureStore for MemorySecureStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
