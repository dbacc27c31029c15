//! Asynchronous channel to the persisted key-value settings store.
//!
//! The bridge owns a persistence task. Callers send it one-way messages; the
//! task performs them against a [`SettingsBackend`] one at a time, in the
//! order they were sent.

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use doc_model::ReadByKeyResponse;

use super::SettingsError;

/// Storage port behind the bridge.
pub trait SettingsBackend: Send + 'static {
    fn read_by_key(&mut self, key: &str) -> Result<ReadByKeyResponse, SettingsError>;
    fn write_by_key(&mut self, key: &str, value: &Value) -> Result<(), SettingsError>;
}

enum Request {
    Read { key: String, reply: oneshot::Sender<Result<ReadByKeyResponse, SettingsError>> },
    Write { key: String, value: Value, ack: oneshot::Sender<Result<(), SettingsError>> },
}

#[derive(Debug, Clone)]
pub struct SettingsBridge {
    requests: mpsc::UnboundedSender<Request>,
}

impl SettingsBridge {
    /// Start the persistence task on `runtime`. It stops once every bridge
    /// handle has been dropped.
    pub fn spawn<B: SettingsBackend>(backend: B, runtime: &Handle) -> Self {
        let (requests, inbox) = mpsc::unbounded_channel();
        runtime.spawn(serve(backend, inbox));
        Self { requests }
    }

    /// Queue a write and return immediately.
    pub fn write(&self, key: &str, value: Value) -> WriteAck {
        let (ack, done) = oneshot::channel();
        let request = Request::Write { key: key.to_owned(), value, ack };

        match self.requests.send(request) {
            Ok(()) => WriteAck::pending(done),
            Err(_) => WriteAck::failed(SettingsError::BridgeClosed),
        }
    }

    pub async fn read(&self, key: &str) -> Result<ReadByKeyResponse, SettingsError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Read { key: key.to_owned(), reply })
            .map_err(|_| SettingsError::BridgeClosed)?;

        response.await.map_err(|_| SettingsError::BridgeClosed)?
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { key, .. } => f.debug_struct("Read").field("key", key).finish(),
            Self::Write { key, value, .. } => {
                f.debug_struct("Write").field("key", key).field("value", value).finish()
            }
        }
    }
}

async fn serve<B: SettingsBackend>(mut backend: B, mut inbox: mpsc::UnboundedReceiver<Request>) {
    while let Some(request) = inbox.recv().await {
        match request {
            Request::Read { key, reply } => {
                let result = backend.read_by_key(&key);
                match &result {
                    Ok(response) => tracing::debug!(
                        %key,
                        file_exists = response.file_exists,
                        key_exists = response.key_exists,
                        "settings read"
                    ),
                    Err(err) => tracing::warn!(%key, error = %err, "settings read failed"),
                }
                let _ = reply.send(result);
            }
            Request::Write { key, value, ack } => {
                let result = backend.write_by_key(&key, &value);
                match &result {
                    Ok(()) => tracing::debug!(%key, "settings written"),
                    Err(err) => tracing::warn!(%key, error = %err, "settings write failed"),
                }
                let _ = ack.send(result);
            }
        }
    }
    tracing::debug!("settings bridge closed");
}

/// Completion signal of a fire-and-forget write.
///
/// Dropping it does not cancel the write.
#[derive(Debug)]
pub struct WriteAck {
    state: AckState,
}

#[derive(Debug)]
enum AckState {
    Pending(oneshot::Receiver<Result<(), SettingsError>>),
    Failed(SettingsError),
}

impl WriteAck {
    fn pending(done: oneshot::Receiver<Result<(), SettingsError>>) -> Self {
        Self { state: AckState::Pending(done) }
    }

    pub(crate) fn failed(error: SettingsError) -> Self {
        Self { state: AckState::Failed(error) }
    }

    /// Wait until the store has applied (or rejected) the write.
    pub async fn wait(self) -> Result<(), SettingsError> {
        match self.state {
            AckState::Pending(done) => done.await.map_err(|_| SettingsError::BridgeClosed)?,
            AckState::Failed(error) => Err(error),
        }
    }
}
