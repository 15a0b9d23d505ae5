//! JSON file backed session storage.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{SessionStorage, StorageError, StorageKey, StorageResult};

/// Session storage kept in a single JSON object on disk.
///
/// Every write replaces the whole file through a temporary sibling and a
/// rename. The file is readable by its owner only.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Creates a storage backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> StorageResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // NamedTempFile is created with mode 0600 on unix.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(values)?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        debug!(path = %self.path.display(), keys = values.len(), "Wrote session storage");
        Ok(())
    }

    /// Current contents for a write, and whether the file must be rewritten
    /// regardless. A corrupt file reads as empty so later writes replace it.
    fn read_for_update(&self) -> StorageResult<(BTreeMap<String, String>, bool)> {
        match self.read_all() {
            Ok(values) => Ok((values, false)),
            Err(StorageError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt session storage");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn update<F>(&self, f: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

        let (mut values, corrupt) = self.read_for_update()?;
        if f(&mut values) || corrupt {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        Ok(self.read_all()?.remove(key.key_name()))
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        self.update(|values| {
            values.insert(key.key_name().to_string(), value.to_string());
            true
        })
    }

    fn clear(&self, key: StorageKey) -> StorageResult<()> {
        self.update(|values| values.remove(key.key_name()).is_some())
    }
}
