use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};

/// Small key-value interface injected into whatever needs shared state.
///
/// Stores start closed. The composition root calls [`open`](Self::open) before
/// handing the store out and [`close`](Self::close) on shutdown; every other
/// operation fails with [`Error::Store`] while the store is closed.
pub trait KeyValueStore: Send + Sync {
    fn open(&self) -> Result<()>;

    fn close(&self) -> Result<()>;

    fn is_open(&self) -> bool;

    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns whether the key was present
    fn remove(&self, key: &str) -> Result<bool>;
}

/// Process-local store, contents survive close/open cycles
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    open: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        if !self.is_open() {
            return Err(Error::Store("memory store is closed".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn open(&self) -> Result<()> {
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries()?.remove(key).is_some())
    }
}
