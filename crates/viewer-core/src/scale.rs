//! Zoom stepping for the page tile view.

use doc_model::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE, SCALE_UNIT};

pub fn zoom_in(scale: f64) -> f64 {
    step(scale, 1)
}

pub fn zoom_out(scale: f64) -> f64 {
    step(scale, -1)
}

/// Bring an arbitrary (e.g. persisted) scale back into the allowed range.
pub fn clamp_scale(scale: f64) -> f64 {
    if !scale.is_finite() {
        return DEFAULT_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn step(scale: f64, direction: i64) -> f64 {
    let scale = clamp_scale(scale);
    let steps = (scale / SCALE_UNIT).round() as i64 + direction;
    // Snap to tenths so repeated steps do not accumulate float error.
    let next = (steps as f64 * SCALE_UNIT * 10.0).round() / 10.0;
    next.clamp(MIN_SCALE, MAX_SCALE)
}
