//! Self-expiring toast queue shared by the whole application.
//!
//! Toasts are appended at the tail. Each one schedules its own timer; when a
//! timer fires the queue drops a toast according to [`DismissPolicy`]. There
//! is no capacity bound and timers cannot be cancelled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use doc_model::{QueuedToast, ToastContent, ToastId, ToastKind};
use tokio::runtime::Handle;

use crate::config::{DismissPolicy, ViewerConfig};
use crate::observable::{Observable, Subscription};

#[derive(Debug, Clone)]
pub struct ToastQueue {
    contents: Observable<Vec<QueuedToast>>,
    next_id: Arc<AtomicU64>,
    default_duration_ms: u64,
    error_duration_ms: u64,
    policy: DismissPolicy,
    runtime: Handle,
}

impl ToastQueue {
    /// Timers are spawned on `runtime`.
    pub fn new(runtime: Handle, config: &ViewerConfig) -> Self {
        Self {
            contents: Observable::new(Vec::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            default_duration_ms: config.toast_duration_ms,
            error_duration_ms: config.error_toast_duration_ms,
            policy: config.toast_dismissal,
            runtime,
        }
    }

    pub fn show(&self, content: ToastContent) -> ToastId {
        let id = ToastId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let duration = Duration::from_millis(content.duration_milliseconds);
        tracing::debug!(id = id.0, kind = ?content.kind, duration_ms = content.duration_milliseconds, "showing toast");

        self.contents.update(|queue| queue.push(QueuedToast { id, content }));

        let queue = self.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            queue.expire(id);
        });

        id
    }

    pub fn info(&self, messages: impl Into<String>, duration_ms: Option<u64>) -> ToastId {
        self.show_kind(ToastKind::Info, messages.into(), duration_ms)
    }

    pub fn success(&self, messages: impl Into<String>, duration_ms: Option<u64>) -> ToastId {
        self.show_kind(ToastKind::Success, messages.into(), duration_ms)
    }

    pub fn error(&self, messages: impl Into<String>, duration_ms: Option<u64>) -> ToastId {
        self.show_kind(ToastKind::Error, messages.into(), duration_ms)
    }

    fn show_kind(&self, kind: ToastKind, messages: String, duration_ms: Option<u64>) -> ToastId {
        let duration = duration_ms.unwrap_or(self.default_duration_ms);
        self.show(ToastContent::new(kind, messages, duration))
    }

    /// Duration the central error handler uses for its toasts.
    pub fn error_duration_ms(&self) -> u64 {
        self.error_duration_ms
    }

    pub fn contents(&self) -> Vec<QueuedToast> {
        self.contents.get()
    }

    pub fn len(&self) -> usize {
        self.contents.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&Vec<QueuedToast>) + Send + Sync + 'static,
    ) -> Subscription {
        self.contents.subscribe(listener)
    }

    fn expire(&self, id: ToastId) {
        let policy = self.policy;
        self.contents.update(|queue| match policy {
            DismissPolicy::PopHead => {
                if queue.is_empty() {
                    tracing::warn!(id = id.0, "toast timer fired on an empty queue");
                    return;
                }
                let removed = queue.remove(0);
                if removed.id != id {
                    tracing::debug!(timer = id.0, removed = removed.id.0, "head toast evicted by another toast's timer");
                }
            }
            DismissPolicy::ById => queue.retain(|toast| toast.id != id),
        });
    }
}
