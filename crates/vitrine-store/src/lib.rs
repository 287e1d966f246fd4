//! Persisted handle lists.
//!
//! Wishlist and compare lists survive page loads as a JSON array of product
//! handles under a single storage key. Only handles are persisted, never
//! product payloads, so the list self-heals when product data changes
//! server-side: stale handles simply fail to load and are skipped by the
//! consuming surface.
//!
//! The backing medium is host-provided through the [`Storage`] trait (a
//! cookie jar or localStorage bridge in a browser host); [`MemoryStorage`]
//! ships for tests and headless use.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Default cap on persisted list length.
pub const DEFAULT_CAPACITY: usize = 100;

/// Errors from the backing storage medium.
#[derive(Debug, Clone, Error)]
#[error("storage error: {0}")]
pub struct StoreError(pub String);

/// A string key/value medium the list persists into.
pub trait Storage {
    /// Read the raw value at `key`, if present.
    fn read(&self, key: &str) -> Option<String>;

    /// Write the raw value at `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory storage for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A deduplicated, capacity-capped list persisted as one JSON array.
///
/// Generic over the element type; product handles (`String`) are the only
/// element the theme persists, but rows with extra metadata serialize the
/// same way.
#[derive(Debug)]
pub struct HandleListStore<S: Storage, T = String> {
    storage: S,
    key: String,
    capacity: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<S: Storage, T> HandleListStore<S, T>
where
    T: Serialize + DeserializeOwned + PartialEq + Clone,
{
    /// Create a store over `storage` at `key` with the default capacity.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self::with_capacity(storage, key, DEFAULT_CAPACITY)
    }

    /// Create a store with an explicit capacity cap.
    pub fn with_capacity(storage: S, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            capacity,
            _marker: std::marker::PhantomData,
        }
    }

    /// All persisted entries, oldest first.
    ///
    /// Unreadable or corrupt persisted JSON degrades to an empty list; the
    /// next write repairs the stored value.
    pub fn all(&self) -> Vec<T> {
        let Some(raw) = self.storage.read(&self.key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding corrupt persisted list");
                Vec::new()
            }
        }
    }

    /// Append an entry if not already present. When the list is at capacity
    /// the oldest entry is evicted. Returns false when the entry was already
    /// in the list.
    pub fn add(&mut self, entry: T) -> Result<bool, StoreError> {
        let mut entries = self.all();
        if entries.contains(&entry) {
            return Ok(false);
        }
        entries.push(entry);
        while entries.len() > self.capacity {
            entries.remove(0);
        }
        self.persist(&entries)?;
        Ok(true)
    }

    /// Remove an entry. Returns false when it was not present.
    pub fn remove(&mut self, entry: &T) -> Result<bool, StoreError> {
        let mut entries = self.all();
        let len_before = entries.len();
        entries.retain(|e| e != entry);
        let removed = entries.len() < len_before;
        if removed {
            self.persist(&entries)?;
        }
        Ok(removed)
    }

    /// Check membership.
    pub fn contains(&self, entry: &T) -> bool {
        self.all().contains(entry)
    }

    /// Number of persisted entries.
    pub fn len(&self) -> usize {
        self.all().len()
    }

    /// True when nothing is persisted.
    pub fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.persist(&[])
    }

    fn persist(&mut self, entries: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries).map_err(|e| StoreError(e.to_string()))?;
        self.storage.write(&self.key, &raw)
    }
}
