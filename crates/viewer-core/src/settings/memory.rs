use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use doc_model::ReadByKeyResponse;
use serde_json::{Map, Value};

use super::bridge::SettingsBackend;
use super::SettingsError;

/// In-process settings store, shared between clones.
///
/// Starts without a settings "file"; the first write creates it. Useful for
/// tests and for running the viewer without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    file: Option<Map<String, Value>>,
    failure: Option<String>,
    read_failures: HashMap<String, String>,
    writes: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: impl IntoIterator<Item = (String, Value)>) -> Self {
        let backend = Self::new();
        backend.lock().file = Some(values.into_iter().collect());
        backend
    }

    /// Make every following operation fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }

    /// Make reads of `key` alone fail with `message`.
    pub fn fail_reads_of(&self, key: impl Into<String>, message: impl Into<String>) {
        self.lock().read_failures.insert(key.into(), message.into());
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.lock().file.as_ref().and_then(|file| file.get(key).cloned())
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsBackend for MemoryBackend {
    fn read_by_key(&mut self, key: &str) -> Result<ReadByKeyResponse, SettingsError> {
        let state = self.lock();
        if let Some(message) = state.failure.as_ref().or_else(|| state.read_failures.get(key)) {
            return Err(SettingsError::Backend(message.clone()));
        }

        Ok(match &state.file {
            None => ReadByKeyResponse::missing_file(),
            Some(file) => match file.get(key) {
                Some(value) => ReadByKeyResponse::found(key, value.clone()),
                None => ReadByKeyResponse::missing_key(key),
            },
        })
    }

    fn write_by_key(&mut self, key: &str, value: &Value) -> Result<(), SettingsError> {
        let mut state = self.lock();
        if let Some(message) = &state.failure {
            return Err(SettingsError::Backend(message.clone()));
        }

        state.file.get_or_insert_with(Map::new).insert(key.to_owned(), value.clone());
        state.writes += 1;
        Ok(())
    }
}
