//! Application-wide shared state, created once by the shell and handed to
//! every view.

use serde::Serialize;
use tokio::runtime::Handle;

use crate::config::ViewerConfig;
use crate::document::{DocumentError, DocumentSearch, DocumentSource};
use crate::error::handle_invoke_error;
use crate::history::LoadedHistory;
use crate::loader::LoadingIndicator;
use crate::session::ViewerSession;
use crate::settings::{
    DisplaySettings, DisplaySnapshot, Settings, SettingsBackend, SettingsBridge, SettingsError,
    WindowGeometrySettings, ZoomedPageViewSettings, ZoomedPageViewSnapshot,
};
use crate::toast::ToastQueue;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: ViewerConfig,
    pub session: ViewerSession,
    pub history: LoadedHistory,
    pub toasts: ToastQueue,
    pub loader: LoadingIndicator,
    pub settings: Settings,
    pub display: DisplaySettings,
    pub zoomed_page_view: ZoomedPageViewSettings,
    pub window: WindowGeometrySettings,
}

/// Every persisted viewer setting after loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSettingsSnapshot {
    pub display: DisplaySnapshot,
    pub zoomed_page_view: ZoomedPageViewSnapshot,
}

impl AppContext {
    /// Spawns the settings persistence task and toast timers on `runtime`.
    pub fn new<B: SettingsBackend>(config: ViewerConfig, backend: B, runtime: &Handle) -> Self {
        let settings = Settings::new(SettingsBridge::spawn(backend, runtime));
        Self {
            session: ViewerSession::new(),
            history: LoadedHistory::new(),
            toasts: ToastQueue::new(runtime.clone(), &config),
            loader: LoadingIndicator::new(),
            display: DisplaySettings::new(&settings),
            zoomed_page_view: ZoomedPageViewSettings::new(&settings),
            window: WindowGeometrySettings::new(&settings),
            settings,
            config,
        }
    }

    /// Load every viewer setting, as the document viewer does on mount.
    /// A failure is shown as an error toast and yields `None`.
    pub async fn load_viewer_settings(&self) -> Option<ViewerSettingsSnapshot> {
        match self.try_load_viewer_settings().await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                handle_invoke_error(&self.toasts, &err);
                None
            }
        }
    }

    /// Like [`AppContext::load_viewer_settings`], but hands the error back
    /// instead of toasting it.
    pub async fn try_load_viewer_settings(&self) -> Result<ViewerSettingsSnapshot, SettingsError> {
        let display = self.display.load_all().await;
        let zoomed_page_view = self.zoomed_page_view.load_all().await;

        Ok(ViewerSettingsSnapshot { display: display?, zoomed_page_view: zoomed_page_view? })
    }

    /// Switch the session to `filepath` and fetch its bytes from `source`.
    pub fn open_document(
        &self,
        source: &impl DocumentSource,
        filepath: &str,
    ) -> Result<(), DocumentError> {
        self.session.reload(filepath);
        self.load_document(source)
    }

    /// Fetch the bytes of the document the session points at, as the viewer
    /// does on mount after [`crate::route::open_document_viewer`].
    ///
    /// The loading indicator is raised for the duration of the read. On
    /// success the buffer lands in the session and the path in the history;
    /// on failure an error toast is shown and the session keeps the path
    /// without a buffer.
    pub fn load_document(&self, source: &impl DocumentSource) -> Result<(), DocumentError> {
        let filepath = self.current_filepath()?;

        self.loader.start();
        let result = source.read(&filepath);
        self.loader.stop();

        match result {
            Ok(buffer) => {
                self.session.set_buffer(buffer);
                self.history.push(&filepath);
                Ok(())
            }
            Err(err) => {
                handle_invoke_error(&self.toasts, &err);
                Err(err)
            }
        }
    }

    /// Search the open document for `term` and publish the outcome to the
    /// session. A failure is toasted and leaves the previous search in place.
    pub fn search(&self, searcher: &impl DocumentSearch, term: &str) -> Result<(), DocumentError> {
        let filepath = self.current_filepath()?;

        self.loader.start();
        let result = searcher.search(term, &filepath);
        self.loader.stop();

        match result {
            Ok(found) => {
                self.session.apply_search(term, found);
                Ok(())
            }
            Err(err) => {
                handle_invoke_error(&self.toasts, &err);
                Err(err)
            }
        }
    }

    fn current_filepath(&self) -> Result<String, DocumentError> {
        match self.session.filepath() {
            Some(filepath) => Ok(filepath),
            None => {
                let err = DocumentError::NoDocument;
                handle_invoke_error(&self.toasts, &err);
                Err(err)
            }
        }
    }
}
