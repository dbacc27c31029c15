use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

pub const DEFAULT_SCALE: f64 = 1.0;
pub const SCALE_UNIT: f64 = 0.2;
pub const MIN_SCALE: f64 = SCALE_UNIT;
pub const MAX_SCALE: f64 = 5.0;

pub const DEFAULT_PAGE_NUM_VISIBLE: bool = false;

pub const DEFAULT_FIX_PAGES_PER_ROW: bool = false;
pub const DEFAULT_PAGES_PER_ROW: u32 = 5;

pub const DEFAULT_TOAST_DURATION_MS: u64 = 5000;
pub const ERROR_TOAST_DURATION_MS: u64 = 10000;

/// Zero-based page position inside the open document.
pub type PageIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastContent {
    pub messages: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub duration_milliseconds: u64,
}

impl ToastContent {
    pub fn new(kind: ToastKind, messages: impl Into<String>, duration_milliseconds: u64) -> Self {
        Self { messages: messages.into(), kind, duration_milliseconds }
    }
}

/// A toast as it sits in the queue, tagged with the id its timer carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedToast {
    pub id: ToastId,
    #[serde(flatten)]
    pub content: ToastContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedHistoryItem {
    pub filename: String,
    pub filepath: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl LoadedHistoryItem {
    pub fn new(filepath: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        let filepath = filepath.into();
        Self { filename: filename(&filepath), filepath, timestamp }
    }
}

/// Document bytes as handed over by a document source.
///
/// A deployment picks one shape; the viewer stores it without looking inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBuffer {
    Whole(Vec<u8>),
    Pages(Vec<Vec<u8>>),
}

impl DocumentBuffer {
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Whole(bytes) => bytes.len(),
            Self::Pages(pages) => pages.iter().map(Vec::len).sum(),
        }
    }
}

/// Outcome of a text search: the document with matches highlighted and the
/// pages holding at least one match, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub buffer: DocumentBuffer,
    pub page_indexes: Vec<PageIndex>,
}

/// Reply shape of a settings lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadByKeyResponse {
    pub key: Option<String>,
    pub value: Option<Value>,
    pub file_exists: bool,
    pub key_exists: bool,
}

impl ReadByKeyResponse {
    pub fn missing_file() -> Self {
        Self { key: None, value: None, file_exists: false, key_exists: false }
    }

    pub fn missing_key(key: &str) -> Self {
        Self { key: Some(key.to_owned()), value: None, file_exists: true, key_exists: false }
    }

    pub fn found(key: &str, value: Value) -> Self {
        Self { key: Some(key.to_owned()), value: Some(value), file_exists: true, key_exists: true }
    }

    /// Collapses "no settings file" and "no such key" into one absent outcome.
    pub fn into_value(self) -> Option<Value> {
        if !self.file_exists || !self.key_exists {
            return None;
        }
        self.value
    }
}

/// Last path segment, split on `/` when one is present and on `\` otherwise.
pub fn filename(filepath: &str) -> String {
    match filepath.rsplit_once('/') {
        Some((_, name)) => name.to_owned(),
        None => filepath.rsplit_once('\\').map_or(filepath, |(_, name)| name).to_owned(),
    }
}
