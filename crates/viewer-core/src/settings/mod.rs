//! Persisted user settings.
//!
//! Every setting is a write-through cache: the in-memory cell is updated
//! synchronously and is authoritative for the running session, while the
//! store is updated in the background on a best-effort basis. A failed
//! write is logged and reported on the returned [`WriteAck`], never rolled
//! back. Values re-enter memory only through [`Settings::load`].

mod bridge;
mod groups;
mod memory;

pub use bridge::{SettingsBackend, SettingsBridge, WriteAck};
pub use groups::{
    DisplaySettings, DisplaySnapshot, PersistedSetting, WindowGeometrySettings,
    ZoomedPageViewSettings, ZoomedPageViewSnapshot,
};
pub use memory::MemoryBackend;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::observable::Observable;

#[derive(Debug, Error)]
pub enum SettingsError {
    /// The store reported a failure; only its message is kept.
    #[error("{0}")]
    Backend(String),
    #[error("settings bridge is closed")]
    BridgeClosed,
    #[error("unable to encode setting: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Generic write-and-cache / load-with-default helpers over a bridge.
#[derive(Debug, Clone)]
pub struct Settings {
    bridge: SettingsBridge,
}

impl Settings {
    pub fn new(bridge: SettingsBridge) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &SettingsBridge {
        &self.bridge
    }

    /// Publish `value` into `cell`, then queue its persistence under `key`.
    pub fn write<T>(&self, key: &str, value: T, cell: &Observable<Option<T>>) -> WriteAck
    where
        T: Serialize + Clone + Send + 'static,
    {
        let encoded = serde_json::to_value(&value);
        cell.set(Some(value));

        match encoded {
            Ok(json) => self.bridge.write(key, json),
            Err(err) => {
                tracing::warn!(%key, error = %err, "setting not persisted");
                WriteAck::failed(SettingsError::Encode(err))
            }
        }
    }

    /// Persisted value for `key`, or `None` when there is no settings file or
    /// no such key in it.
    pub async fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.bridge.read(key).await?.into_value())
    }

    /// Read `key`, fall back to `default` when absent, hand the result to
    /// `setter` and return it. The default is not written back to the store.
    pub async fn load<T>(
        &self,
        key: &str,
        setter: impl FnOnce(T),
        default: T,
    ) -> Result<T, SettingsError>
    where
        T: DeserializeOwned + Clone,
    {
        let value = match self.read(key).await? {
            None => default,
            Some(raw) => match serde_json::from_value::<T>(raw) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(%key, error = %err, "persisted setting has unexpected shape; using default");
                    default
                }
            },
        };

        setter(value.clone());
        Ok(value)
    }
}
