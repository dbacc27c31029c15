//! Startup window geometry derived from the persisted size.

use serde::Serialize;

use crate::SettingsFile;

const WIDTH_RESOLUTION_RATIO: f64 = 0.80;
const HEIGHT_RESOLUTION_RATIO: f64 = 0.84;

const WINDOW_WIDTH_KEY: &str = "windowWidth";
const WINDOW_HEIGHT_KEY: &str = "windowHeight";

/// Physical size of the monitor the window opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowPlacement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Size and center the main window on `monitor`.
///
/// A persisted dimension is used as is, capped to the monitor. A missing or
/// unreadable one falls back to a fixed share of the monitor.
pub fn initial_window_size(store: &SettingsFile, monitor: Resolution) -> WindowPlacement {
    let width = persisted_dimension(store, WINDOW_WIDTH_KEY)
        .map(|width| width.min(monitor.width))
        .unwrap_or_else(|| scaled(monitor.width, WIDTH_RESOLUTION_RATIO));
    let height = persisted_dimension(store, WINDOW_HEIGHT_KEY)
        .map(|height| height.min(monitor.height))
        .unwrap_or_else(|| scaled(monitor.height, HEIGHT_RESOLUTION_RATIO));

    WindowPlacement {
        width,
        height,
        x: (monitor.width - width) / 2,
        y: (monitor.height - height) / 2,
    }
}

/// Title of the main window while `filepath` is open.
pub fn window_title(filepath: Option<&str>, default_title: &str) -> String {
    match filepath {
        Some(filepath) => format!("{filepath} [{default_title}]"),
        None => default_title.to_owned(),
    }
}

fn persisted_dimension(store: &SettingsFile, key: &str) -> Option<u32> {
    let response = match store.read_by_key(key) {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(%key, error = %err, "unable to read persisted window size");
            return None;
        }
    };

    response.into_value()?.as_u64().and_then(|value| u32::try_from(value).ok())
}

fn scaled(length: u32, ratio: f64) -> u32 {
    (f64::from(length) * ratio).round() as u32
}
