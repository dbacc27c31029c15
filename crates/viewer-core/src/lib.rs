//! Pagetile Viewer Core
//!
//! Reactive viewer state, persisted settings and toast notifications shared
//! by every view of the page tile viewer.

pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod history;
pub mod loader;
pub mod observable;
pub mod route;
pub mod scale;
pub mod session;
pub mod settings;
pub mod toast;

pub use config::{DismissPolicy, ViewerConfig};
pub use context::{AppContext, ViewerSettingsSnapshot};
pub use document::{DocumentError, DocumentSearch, DocumentSource, FsDocumentSource};
pub use error::handle_invoke_error;
pub use history::LoadedHistory;
pub use loader::LoadingIndicator;
pub use observable::{Observable, Subscription};
pub use route::{open_dashboard, open_document_viewer, Navigator, RecordingNavigator, Route};
pub use scale::{clamp_scale, zoom_in, zoom_out};
pub use session::{format_matched_pages, SessionSnapshot, ViewerSession};
pub use settings::{
    DisplaySettings, DisplaySnapshot, MemoryBackend, PersistedSetting, Settings, SettingsBackend,
    SettingsBridge, SettingsError, WindowGeometrySettings, WriteAck, ZoomedPageViewSettings,
    ZoomedPageViewSnapshot,
};
pub use toast::ToastQueue;
