//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use session_todos::{MemorySessionStore, SessionStore, StorageError, TodoItem};

/// Session store that can be told to fail, and counts calls
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: MemorySessionStore,
    pub read_error: Option<StorageError>,
    pub write_error: Option<StorageError>,
    pub remove_error: Option<StorageError>,
    pub writes: usize,
    pub removes: usize,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `raw` under `key`
    pub fn with_item(key: &str, raw: &str) -> Self {
        let mut store = Self::new();
        store.inner.set_item(key, raw).unwrap();
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).unwrap()
    }
}

impl SessionStore for ScriptedStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.read_error {
            Some(e) => Err(e.clone()),
            None => self.inner.get_item(key),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes += 1;
        match &self.write_error {
            Some(e) => Err(e.clone()),
            None => self.inner.set_item(key, value),
        }
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.removes += 1;
        match &self.remove_error {
            Some(e) => Err(e.clone()),
            None => self.inner.remove_item(key),
        }
    }
}

/// Create a test item with a fixed creation time
pub fn create_test_item(id: &str, title: &str, description: &str) -> TodoItem {
    let created_at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
    TodoItem::new(id, title, description, created_at)
}
