use doc_model::{DEFAULT_TOAST_DURATION_MS, ERROR_TOAST_DURATION_MS};
use serde::{Deserialize, Serialize};

/// Which toast leaves the queue when a toast timer fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissPolicy {
    /// Whatever sits at the head of the queue, regardless of which timer fired.
    /// Toasts shown out of duration order can evict each other early.
    #[default]
    PopHead,
    /// The toast whose timer fired.
    ById,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub toast_duration_ms: u64,
    pub error_toast_duration_ms: u64,
    pub toast_dismissal: DismissPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            error_toast_duration_ms: ERROR_TOAST_DURATION_MS,
            toast_dismissal: DismissPolicy::PopHead,
        }
    }
}
