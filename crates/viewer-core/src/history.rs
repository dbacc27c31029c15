//! Previously opened documents, oldest first.

use doc_model::LoadedHistoryItem;
use time::OffsetDateTime;

use crate::observable::{Observable, Subscription};

#[derive(Debug, Clone, Default)]
pub struct LoadedHistory {
    items: Observable<Vec<LoadedHistoryItem>>,
}

impl LoadedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `filepath` was opened now.
    pub fn push(&self, filepath: &str) {
        self.push_at(filepath, OffsetDateTime::now_utc());
    }

    /// Record an open at a given time. A path already in the list moves to the tail.
    pub fn push_at(&self, filepath: &str, timestamp: OffsetDateTime) {
        self.items.update(|items| {
            if let Some(index) = items.iter().position(|item| item.filepath == filepath) {
                items.remove(index);
            }
            items.push(LoadedHistoryItem::new(filepath, timestamp));
        });
    }

    pub fn items(&self) -> Vec<LoadedHistoryItem> {
        self.items.get()
    }

    pub fn most_recent(&self) -> Option<LoadedHistoryItem> {
        self.items.with(|items| items.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.items.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&Vec<LoadedHistoryItem>) + Send + Sync + 'static,
    ) -> Subscription {
        self.items.subscribe(listener)
    }
}
