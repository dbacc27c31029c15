use directories::ProjectDirs;
use doc_model::ReadByKeyResponse;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use viewer_core::{SettingsBackend, SettingsError};

mod window;

pub use window::{initial_window_size, window_title, Resolution, WindowPlacement};

const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Settings persisted as a single JSON object keyed by setting name.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    root: PathBuf,
}

impl SettingsFile {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "Pagetile", "Pagetile")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE_NAME)
    }

    /// Look up `key`. A missing file and a missing key are reported apart;
    /// a file holding something other than a JSON object has no keys.
    pub fn read_by_key(&self, key: &str) -> Result<ReadByKeyResponse, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(ReadByKeyResponse::missing_file());
        }

        let bytes = fs::read(path)?;
        let value: Value = serde_json::from_slice(&bytes)?;

        Ok(match value.get(key) {
            Some(found) => ReadByKeyResponse::found(key, found.clone()),
            None => ReadByKeyResponse::missing_key(key),
        })
    }

    /// Store `value` under `key`, keeping every other key. Creates the file
    /// and its directory when needed; unreadable content is replaced.
    pub fn write_by_key(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;

        let mut settings = self.load_object();
        settings.insert(key.to_owned(), value.clone());

        let bytes = serde_json::to_vec_pretty(&Value::Object(settings))?;
        fs::write(self.path(), bytes)?;
        Ok(())
    }

    fn load_object(&self) -> Map<String, Value> {
        let Ok(bytes) = fs::read(self.path()) else {
            return Map::new();
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path().display(), "settings file is not a JSON object; replacing it");
                Map::new()
            }
        }
    }
}

impl SettingsBackend for SettingsFile {
    fn read_by_key(&mut self, key: &str) -> Result<ReadByKeyResponse, SettingsError> {
        SettingsFile::read_by_key(self, key).map_err(|err| SettingsError::Backend(err.to_string()))
    }

    fn write_by_key(&mut self, key: &str, value: &Value) -> Result<(), SettingsError> {
        SettingsFile::write_by_key(self, key, value)
            .map_err(|err| SettingsError::Backend(err.to_string()))
    }
}
