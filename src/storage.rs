//! Session-scoped key-value storage
//!
//! `SessionStore` is the port the persistence gateway talks to: a flat map of
//! string keys to string values whose contents live as long as the session.
//! `MemorySessionStore` is the in-process medium used by the application; it
//! enforces a byte allotment the same way a browser's session storage does.

use std::collections::HashMap;
use thiserror::Error;

/// Default allotment for one session, in bytes (5 MiB)
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Failure raised by a storage medium
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The write would exceed the session's storage allotment
    #[error("quota exceeded: write needs {requested} bytes but the session allows {quota}")]
    QuotaExceeded { requested: usize, quota: usize },
    /// The storage medium cannot be accessed at all
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Any other failure
    #[error("storage error: {0}")]
    Other(String),
}

impl StorageError {
    /// Check whether this is a capacity failure
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

/// Key-value storage with session lifetime
///
/// Reads and writes are synchronous. A failed `set_item` must leave the
/// previous value for that key untouched.
pub trait SessionStore {
    /// Read the value stored under `key`, `None` when absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove `key`; removing an absent key succeeds
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory session storage with a byte quota
///
/// Each entry is charged `key.len() + value.len()` bytes. Replacing a key
/// charges only the new entry size.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
    used_bytes: usize,
    quota_bytes: usize,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }
}

impl MemorySessionStore {
    /// Create an empty store with the default quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a custom quota
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            used_bytes: 0,
            quota_bytes,
        }
    }

    /// Bytes currently charged against the quota
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Total allotment for this session
    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_size(key: &str, value: &str) -> usize {
        key.len() + value.len()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self
            .entries
            .get(key)
            .map(|old| Self::entry_size(key, old))
            .unwrap_or(0);
        let requested = self.used_bytes - previous + Self::entry_size(key, value);
        if requested > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                requested,
                quota: self.quota_bytes,
            });
        }

        self.entries.insert(key.to_string(), value.to_string());
        self.used_bytes = requested;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if let Some(old) = self.entries.remove(key) {
            self.used_bytes -= Self::entry_size(key, &old);
        }
        Ok(())
    }
}
