use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::persistence::KeyValueStore;

/// Store backed by a single JSON object on disk.
///
/// The file is read on `open` and replaced atomically on `flush` and `close`.
/// A missing file opens as an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Option<HashMap<String, String>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Write the current contents to disk without closing
    pub fn flush(&self) -> Result<()> {
        let guard = self.lock()?;
        let entries = guard
            .as_ref()
            .ok_or_else(|| Error::Store(format!("{} is not open", self.path.display())))?;
        self.write(entries)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<HashMap<String, String>>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Store("file store lock poisoned".to_string()))
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> Result<T> {
        let mut guard = self.lock()?;
        match guard.as_mut() {
            Some(entries) => Ok(f(entries)),
            None => Err(Error::Store(format!(
                "{} is not open",
                self.path.display()
            ))),
        }
    }

    /// Replace the file atomically through a sibling temp file
    fn write(&self, entries: &HashMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut temp, entries)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Flushed {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn open(&self) -> Result<()> {
        let mut guard = self.lock()?;
        if guard.is_some() {
            return Ok(());
        }

        let entries = if self.path.exists() {
            let file = fs::File::open(&self.path)?;
            serde_json::from_reader(file).map_err(|e| {
                Error::Store(format!("Failed to parse {}: {}", self.path.display(), e))
            })?
        } else {
            HashMap::new()
        };

        info!(
            "Opened store at {} with {} entries",
            self.path.display(),
            entries.len()
        );
        *guard = Some(entries);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.lock()?;
        if let Some(entries) = guard.as_ref() {
            // Stay open with everything in memory if the write fails
            self.write(entries)?;
        }
        *guard = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.with_entries(|entries| entries.remove(key).is_some())
    }
}
