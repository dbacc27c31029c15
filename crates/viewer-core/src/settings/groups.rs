//! Named settings grouped per viewer feature.
//!
//! Groups do not enforce relations between their settings; for instance
//! `pagesPerRow` is stored whether or not `fixPagesPerRow` is on.

use doc_model::{
    DEFAULT_FIX_PAGES_PER_ROW, DEFAULT_PAGES_PER_ROW, DEFAULT_PAGE_NUM_VISIBLE, DEFAULT_SCALE,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Settings, SettingsError, WriteAck};
use crate::observable::{Observable, Subscription};

pub const KEY_SCALE: &str = "scale";
pub const KEY_PAGE_NUM_VISIBLE: &str = "pageNumVisible";
pub const KEY_FIX_PAGES_PER_ROW: &str = "fixPagesPerRow";
pub const KEY_PAGES_PER_ROW: &str = "pagesPerRow";
pub const KEY_ZOOM_VIEW_BACKGROUND_LOCKED: &str = "zoomViewBackgroundLocked";
pub const KEY_ZOOM_VIEW_SCALE: &str = "zoomViewScale";
pub const KEY_WINDOW_WIDTH: &str = "windowWidth";
pub const KEY_WINDOW_HEIGHT: &str = "windowHeight";

/// One persisted setting: a key plus the cell caching its value.
///
/// The cell holds `None` until the first `set` or `load`.
#[derive(Debug, Clone)]
pub struct PersistedSetting<T> {
    key: &'static str,
    cell: Observable<Option<T>>,
    settings: Settings,
}

impl<T> PersistedSetting<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + 'static,
{
    pub fn new(key: &'static str, settings: Settings) -> Self {
        Self { key, cell: Observable::new(None), settings }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn get(&self) -> Option<T> {
        self.cell.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&Option<T>) + Send + Sync + 'static) -> Subscription {
        self.cell.subscribe(listener)
    }

    pub fn set(&self, value: T) -> WriteAck {
        self.settings.write(self.key, value, &self.cell)
    }

    pub async fn load(&self, default: T) -> Result<T, SettingsError> {
        let cell = self.cell.clone();
        self.settings.load(self.key, move |value| cell.set(Some(value)), default).await
    }
}

/// Page tile view: zoom scale, page numbers and row layout.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub scale: PersistedSetting<f64>,
    pub page_num_visible: PersistedSetting<bool>,
    pub fix_pages_per_row: PersistedSetting<bool>,
    pub pages_per_row: PersistedSetting<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySnapshot {
    pub scale: f64,
    pub page_num_visible: bool,
    pub fix_pages_per_row: bool,
    pub pages_per_row: u32,
}

impl DisplaySnapshot {
    /// Row width to lay out, or `None` when the row width should follow the window.
    pub fn effective_pages_per_row(&self) -> Option<u32> {
        self.fix_pages_per_row.then_some(self.pages_per_row)
    }
}

impl DisplaySettings {
    pub fn new(settings: &Settings) -> Self {
        Self {
            scale: PersistedSetting::new(KEY_SCALE, settings.clone()),
            page_num_visible: PersistedSetting::new(KEY_PAGE_NUM_VISIBLE, settings.clone()),
            fix_pages_per_row: PersistedSetting::new(KEY_FIX_PAGES_PER_ROW, settings.clone()),
            pages_per_row: PersistedSetting::new(KEY_PAGES_PER_ROW, settings.clone()),
        }
    }

    /// Load every setting with its stock default, as the viewer does on mount.
    ///
    /// Each setting loads on its own, so one failing key still leaves the
    /// others cached. The first failure, in field order, is returned.
    pub async fn load_all(&self) -> Result<DisplaySnapshot, SettingsError> {
        let scale = self.scale.load(DEFAULT_SCALE).await;
        let page_num_visible = self.page_num_visible.load(DEFAULT_PAGE_NUM_VISIBLE).await;
        let fix_pages_per_row = self.fix_pages_per_row.load(DEFAULT_FIX_PAGES_PER_ROW).await;
        let pages_per_row = self.pages_per_row.load(DEFAULT_PAGES_PER_ROW).await;

        Ok(DisplaySnapshot {
            scale: scale?,
            page_num_visible: page_num_visible?,
            fix_pages_per_row: fix_pages_per_row?,
            pages_per_row: pages_per_row?,
        })
    }
}

/// Single zoomed page overlay.
#[derive(Debug, Clone)]
pub struct ZoomedPageViewSettings {
    pub background_locked: PersistedSetting<bool>,
    pub scale: PersistedSetting<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomedPageViewSnapshot {
    pub background_locked: bool,
    pub scale: f64,
}

impl ZoomedPageViewSettings {
    pub fn new(settings: &Settings) -> Self {
        Self {
            background_locked: PersistedSetting::new(
                KEY_ZOOM_VIEW_BACKGROUND_LOCKED,
                settings.clone(),
            ),
            scale: PersistedSetting::new(KEY_ZOOM_VIEW_SCALE, settings.clone()),
        }
    }

    /// Same contract as [`DisplaySettings::load_all`].
    pub async fn load_all(&self) -> Result<ZoomedPageViewSnapshot, SettingsError> {
        let background_locked = self.background_locked.load(false).await;
        let scale = self.scale.load(DEFAULT_SCALE).await;

        Ok(ZoomedPageViewSnapshot { background_locked: background_locked?, scale: scale? })
    }
}

/// Last window size. Written on resize; read back by the shell at startup,
/// not through this group.
#[derive(Debug, Clone)]
pub struct WindowGeometrySettings {
    width: PersistedSetting<u32>,
    height: PersistedSetting<u32>,
}

impl WindowGeometrySettings {
    pub fn new(settings: &Settings) -> Self {
        Self {
            width: PersistedSetting::new(KEY_WINDOW_WIDTH, settings.clone()),
            height: PersistedSetting::new(KEY_WINDOW_HEIGHT, settings.clone()),
        }
    }

    pub fn set_window_width(&self, width: u32) -> WriteAck {
        self.width.set(width)
    }

    pub fn set_window_height(&self, height: u32) -> WriteAck {
        self.height.set(height)
    }

    pub fn subscribe_window_width(
        &self,
        listener: impl Fn(&Option<u32>) + Send + Sync + 'static,
    ) -> Subscription {
        self.width.subscribe(listener)
    }

    pub fn subscribe_window_height(
        &self,
        listener: impl Fn(&Option<u32>) + Send + Sync + 'static,
    ) -> Subscription {
        self.height.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemoryBackend, SettingsBridge};
    use serde_json::json;
    use tokio::runtime::Handle;

    fn settings_over(backend: &MemoryBackend) -> Settings {
        Settings::new(SettingsBridge::spawn(backend.clone(), &Handle::current()))
    }

    #[tokio::test]
    async fn empty_store_loads_stock_defaults() {
        let backend = MemoryBackend::new();
        let display = DisplaySettings::new(&settings_over(&backend));

        let snapshot = display.load_all().await.expect("load should succeed");

        assert_eq!(
            snapshot,
            DisplaySnapshot {
                scale: 1.0,
                page_num_visible: false,
                fix_pages_per_row: false,
                pages_per_row: 5,
            }
        );
        assert_eq!(display.pages_per_row.get(), Some(5));
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn stored_values_override_defaults() {
        let backend = MemoryBackend::with_values([
            ("scale".to_owned(), json!(2.4)),
            ("fixPagesPerRow".to_owned(), json!(true)),
            ("pagesPerRow".to_owned(), json!(3)),
        ]);
        let display = DisplaySettings::new(&settings_over(&backend));

        let snapshot = display.load_all().await.expect("load should succeed");

        assert_eq!(snapshot.scale, 2.4);
        assert_eq!(snapshot.effective_pages_per_row(), Some(3));
        assert!(!snapshot.page_num_visible);
    }

    #[tokio::test]
    async fn unfixed_rows_ignore_pages_per_row() {
        let backend = MemoryBackend::with_values([("pagesPerRow".to_owned(), json!(8))]);
        let display = DisplaySettings::new(&settings_over(&backend));

        let snapshot = display.load_all().await.expect("load should succeed");
        assert_eq!(snapshot.pages_per_row, 8);
        assert_eq!(snapshot.effective_pages_per_row(), None);
    }

    #[tokio::test]
    async fn failing_key_does_not_stop_the_rest_of_the_group() {
        let backend = MemoryBackend::with_values([("pagesPerRow".to_owned(), json!(4))]);
        backend.fail_reads_of("scale", "disk unplugged");
        let display = DisplaySettings::new(&settings_over(&backend));

        let err = display.load_all().await.expect_err("scale read should fail");

        assert!(err.to_string().contains("disk unplugged"));
        assert_eq!(display.scale.get(), None);
        assert_eq!(display.page_num_visible.get(), Some(false));
        assert_eq!(display.fix_pages_per_row.get(), Some(false));
        assert_eq!(display.pages_per_row.get(), Some(4));
    }

    #[tokio::test]
    async fn first_failure_in_field_order_is_reported() {
        let backend = MemoryBackend::new();
        backend.fail_reads_of("zoomViewScale", "scale unreadable");
        backend.fail_reads_of("zoomViewBackgroundLocked", "lock unreadable");
        let zoomed = ZoomedPageViewSettings::new(&settings_over(&backend));

        let err = zoomed.load_all().await.expect_err("both reads should fail");

        assert!(err.to_string().contains("lock unreadable"));
    }

    #[tokio::test]
    async fn set_persists_under_the_setting_key() {
        let backend = MemoryBackend::new();
        let settings = settings_over(&backend);
        let zoomed = ZoomedPageViewSettings::new(&settings);

        zoomed.background_locked.set(true).wait().await.expect("write should succeed");
        zoomed.scale.set(3.0).wait().await.expect("write should succeed");

        assert_eq!(backend.value("zoomViewBackgroundLocked"), Some(json!(true)));
        assert_eq!(backend.value("zoomViewScale"), Some(json!(3.0)));

        let reloaded = ZoomedPageViewSettings::new(&settings);
        let snapshot = reloaded.load_all().await.expect("load should succeed");
        assert_eq!(snapshot, ZoomedPageViewSnapshot { background_locked: true, scale: 3.0 });
    }

    #[tokio::test]
    async fn window_geometry_is_write_only() {
        let backend = MemoryBackend::new();
        let window = WindowGeometrySettings::new(&settings_over(&backend));

        let _ = window.set_window_width(1280);
        window.set_window_height(800).wait().await.expect("write should succeed");

        assert_eq!(backend.value("windowWidth"), Some(json!(1280)));
        assert_eq!(backend.value("windowHeight"), Some(json!(800)));
    }

    #[tokio::test]
    async fn subscribers_see_set_before_persistence() {
        let backend = MemoryBackend::new();
        let display = DisplaySettings::new(&settings_over(&backend));
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        let _sub = display.page_num_visible.subscribe(move |v| sink.lock().unwrap().push(*v));

        let ack = display.page_num_visible.set(true);
        assert_eq!(*seen.lock().unwrap(), vec![None, Some(true)]);
        ack.wait().await.expect("write should succeed");
    }
}
