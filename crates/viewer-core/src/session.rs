//! Live state of the document currently shown in the viewer.
//!
//! Nothing here is persisted. Every field is its own observable cell so that
//! incremental updates (search results streaming in, zoom overlay toggles)
//! never disturb unrelated fields. Only [`ViewerSession::reset`] and
//! [`ViewerSession::reload`] touch everything at once.

use std::sync::Arc;

use doc_model::{DocumentBuffer, PageIndex, SearchResult};
use serde::Serialize;

use crate::observable::{Observable, Subscription};

#[derive(Debug, Clone, Default)]
pub struct ViewerSession {
    filepath: Observable<Option<String>>,
    buffer: Observable<Option<Arc<DocumentBuffer>>>,
    matched_page_indexes: Observable<Vec<PageIndex>>,
    confirmed_search_term: Observable<Option<String>>,
    display_matched_pages: Observable<Option<String>>,
    zoomed_page_index: Observable<Option<PageIndex>>,
    zoom_view_background_locked: Observable<bool>,
    zen_mode: Observable<bool>,
}

/// Point-in-time copy of a session, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub filepath: Option<String>,
    pub buffer_bytes: Option<usize>,
    pub matched_page_indexes: Vec<PageIndex>,
    pub confirmed_search_term: Option<String>,
    pub display_matched_pages: Option<String>,
    pub zoomed_page_index: Option<PageIndex>,
    pub zoom_view_background_locked: bool,
    pub zen_mode: bool,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every field back to its initial value. Safe to call repeatedly.
    pub fn reset(&self) {
        self.filepath.set(None);
        self.buffer.set(None);
        self.matched_page_indexes.set(Vec::new());
        self.confirmed_search_term.set(None);
        self.display_matched_pages.set(None);
        self.zoomed_page_index.set(None);
        self.zoom_view_background_locked.set(false);
        self.zen_mode.set(false);
    }

    /// Switch to another document, dropping all state of the previous one.
    pub fn reload(&self, filepath: impl Into<String>) {
        let filepath = filepath.into();
        tracing::debug!(%filepath, "reloading viewer session");
        self.reset();
        self.filepath.set(Some(filepath));
    }

    pub fn filepath(&self) -> Option<String> {
        self.filepath.get()
    }

    /// Sets the path alone. Use [`ViewerSession::reload`] when switching documents.
    pub fn set_filepath(&self, filepath: impl Into<String>) {
        self.filepath.set(Some(filepath.into()));
    }

    pub fn subscribe_filepath(
        &self,
        listener: impl Fn(&Option<String>) + Send + Sync + 'static,
    ) -> Subscription {
        self.filepath.subscribe(listener)
    }

    pub fn buffer(&self) -> Option<Arc<DocumentBuffer>> {
        self.buffer.get()
    }

    pub fn set_buffer(&self, buffer: DocumentBuffer) {
        self.buffer.set(Some(Arc::new(buffer)));
    }

    pub fn subscribe_buffer(
        &self,
        listener: impl Fn(&Option<Arc<DocumentBuffer>>) + Send + Sync + 'static,
    ) -> Subscription {
        self.buffer.subscribe(listener)
    }

    pub fn matched_page_indexes(&self) -> Vec<PageIndex> {
        self.matched_page_indexes.get()
    }

    pub fn set_matched_page_indexes(&self, indexes: Vec<PageIndex>) {
        self.matched_page_indexes.set(indexes);
    }

    pub fn subscribe_matched_page_indexes(
        &self,
        listener: impl Fn(&Vec<PageIndex>) + Send + Sync + 'static,
    ) -> Subscription {
        self.matched_page_indexes.subscribe(listener)
    }

    pub fn confirmed_search_term(&self) -> Option<String> {
        self.confirmed_search_term.get()
    }

    // Matches are not cleared here; a new search sets both term and matches.
    pub fn set_confirmed_search_term(&self, term: impl Into<String>) {
        self.confirmed_search_term.set(Some(term.into()));
    }

    pub fn subscribe_confirmed_search_term(
        &self,
        listener: impl Fn(&Option<String>) + Send + Sync + 'static,
    ) -> Subscription {
        self.confirmed_search_term.subscribe(listener)
    }

    pub fn display_matched_pages(&self) -> Option<String> {
        self.display_matched_pages.get()
    }

    pub fn set_display_matched_pages(&self, pages: Option<String>) {
        self.display_matched_pages.set(pages);
    }

    pub fn subscribe_display_matched_pages(
        &self,
        listener: impl Fn(&Option<String>) + Send + Sync + 'static,
    ) -> Subscription {
        self.display_matched_pages.subscribe(listener)
    }

    pub fn zoomed_page_index(&self) -> Option<PageIndex> {
        self.zoomed_page_index.get()
    }

    pub fn set_zoomed_page_index(&self, index: Option<PageIndex>) {
        self.zoomed_page_index.set(index);
    }

    pub fn subscribe_zoomed_page_index(
        &self,
        listener: impl Fn(&Option<PageIndex>) + Send + Sync + 'static,
    ) -> Subscription {
        self.zoomed_page_index.subscribe(listener)
    }

    pub fn zoom_view_background_locked(&self) -> bool {
        self.zoom_view_background_locked.get()
    }

    pub fn set_zoom_view_background_locked(&self, locked: bool) {
        self.zoom_view_background_locked.set(locked);
    }

    pub fn subscribe_zoom_view_background_locked(
        &self,
        listener: impl Fn(&bool) + Send + Sync + 'static,
    ) -> Subscription {
        self.zoom_view_background_locked.subscribe(listener)
    }

    pub fn zen_mode(&self) -> bool {
        self.zen_mode.get()
    }

    pub fn set_zen_mode(&self, enabled: bool) {
        self.zen_mode.set(enabled);
    }

    pub fn subscribe_zen_mode(&self, listener: impl Fn(&bool) + Send + Sync + 'static) -> Subscription {
        self.zen_mode.subscribe(listener)
    }

    /// Confirm a finished search: the highlighted buffer, the matches, the
    /// term and the page list shown to the user all change together.
    pub fn apply_search(&self, term: impl Into<String>, result: SearchResult) {
        let term = term.into();
        tracing::debug!(%term, matches = result.page_indexes.len(), "search applied");
        self.set_buffer(result.buffer);
        self.set_display_matched_pages(format_matched_pages(&result.page_indexes));
        self.set_matched_page_indexes(result.page_indexes);
        self.set_confirmed_search_term(term);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            filepath: self.filepath(),
            buffer_bytes: self.buffer.with(|buffer| buffer.as_ref().map(|b| b.byte_len())),
            matched_page_indexes: self.matched_page_indexes(),
            confirmed_search_term: self.confirmed_search_term(),
            display_matched_pages: self.display_matched_pages(),
            zoomed_page_index: self.zoomed_page_index(),
            zoom_view_background_locked: self.zoom_view_background_locked(),
            zen_mode: self.zen_mode(),
        }
    }
}

/// One-based page numbers joined for display, or `None` without matches.
pub fn format_matched_pages(indexes: &[PageIndex]) -> Option<String> {
    if indexes.is_empty() {
        return None;
    }
    let pages: Vec<String> = indexes.iter().map(|index| (index + 1).to_string()).collect();
    Some(pages.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn dirty_session() -> ViewerSession {
        let session = ViewerSession::new();
        session.set_filepath("/old/doc.pdf");
        session.set_buffer(DocumentBuffer::Whole(vec![1, 2, 3]));
        session.set_matched_page_indexes(vec![0, 4]);
        session.set_confirmed_search_term("needle");
        session.set_display_matched_pages(Some("1, 5".to_owned()));
        session.set_zoomed_page_index(Some(4));
        session.set_zoom_view_background_locked(true);
        session.set_zen_mode(true);
        session
    }

    #[test]
    fn fresh_session_is_empty() {
        let snapshot = ViewerSession::new().snapshot();
        assert_eq!(snapshot.filepath, None);
        assert_eq!(snapshot.buffer_bytes, None);
        assert!(snapshot.matched_page_indexes.is_empty());
        assert!(!snapshot.zen_mode);
    }

    #[test]
    fn reload_discards_previous_document_state() {
        let session = dirty_session();
        session.reload("/new/doc.pdf");

        assert_eq!(
            session.snapshot(),
            SessionSnapshot {
                filepath: Some("/new/doc.pdf".to_owned()),
                buffer_bytes: None,
                matched_page_indexes: Vec::new(),
                confirmed_search_term: None,
                display_matched_pages: None,
                zoomed_page_index: None,
                zoom_view_background_locked: false,
                zen_mode: false,
            }
        );
    }

    #[test]
    fn reset_is_idempotent() {
        let session = dirty_session();
        session.reset();
        let once = session.snapshot();
        session.reset();

        assert_eq!(session.snapshot(), once);
        assert_eq!(once, ViewerSession::new().snapshot());
    }

    #[test]
    fn set_filepath_leaves_other_fields_alone() {
        let session = dirty_session();
        session.set_filepath("/other.pdf");

        assert_eq!(session.filepath().as_deref(), Some("/other.pdf"));
        assert_eq!(session.matched_page_indexes(), vec![0, 4]);
        assert!(session.zen_mode());
        assert!(session.buffer().is_some());
    }

    #[test]
    fn new_search_term_keeps_stale_matches() {
        let session = dirty_session();
        session.set_confirmed_search_term("other");

        assert_eq!(session.confirmed_search_term().as_deref(), Some("other"));
        assert_eq!(session.matched_page_indexes(), vec![0, 4]);
    }

    #[test]
    fn subscribers_observe_reload_sequence() {
        let session = dirty_session();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = session.subscribe_filepath(move |path| sink.lock().unwrap().push(path.clone()));

        session.reload("/b.pdf");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("/old/doc.pdf".to_owned()), None, Some("/b.pdf".to_owned())]
        );
    }

    #[test]
    fn search_replaces_stale_matches_together() {
        let session = dirty_session();

        session.apply_search(
            "fresh",
            SearchResult { buffer: DocumentBuffer::Whole(vec![9; 5]), page_indexes: vec![1, 2, 7] },
        );

        assert_eq!(session.confirmed_search_term().as_deref(), Some("fresh"));
        assert_eq!(session.matched_page_indexes(), vec![1, 2, 7]);
        assert_eq!(session.display_matched_pages().as_deref(), Some("2, 3, 8"));
        assert_eq!(session.snapshot().buffer_bytes, Some(5));
        assert_eq!(session.filepath().as_deref(), Some("/old/doc.pdf"));
    }

    #[test]
    fn search_without_matches_clears_display_string() {
        let session = dirty_session();

        session.apply_search(
            "absent",
            SearchResult { buffer: DocumentBuffer::Whole(vec![1]), page_indexes: Vec::new() },
        );

        assert!(session.matched_page_indexes().is_empty());
        assert_eq!(session.display_matched_pages(), None);
    }
}
