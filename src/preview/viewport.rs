// Viewport state: bounded magnification plus fullscreen intent reconciled
// against asynchronous platform truth.

use tracing::warn;

use crate::config::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::error::PreviewError;

/// Platform fullscreen capability. The host must also feed the platform's
/// fullscreen-change notification back through
/// [`ViewportController::on_fullscreen_change`]; the request alone is not
/// authoritative (the user can exit with escape at any time).
pub trait FullscreenHost: Send + Sync {
    fn request_fullscreen(&self, enter: bool) -> Result<(), PreviewError>;
}

pub struct ViewportController {
    zoom: f64,
    /// Optimistically flipped on toggle; what the UI mirrors.
    intended_fullscreen: bool,
    /// Last state confirmed by the platform change notification.
    confirmed_fullscreen: bool,
}

impl ViewportController {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            intended_fullscreen: false,
            confirmed_fullscreen: false,
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn set_zoom(&mut self, value: f64) {
        self.zoom = value.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Flip the intended state and ask the platform for the transition.
    /// The flip is optimistic: a denial (or a later external exit) is
    /// reconciled by [`Self::on_fullscreen_change`], never assumed here.
    pub fn toggle_fullscreen(&mut self, host: &dyn FullscreenHost) -> Result<(), PreviewError> {
        let enter = !self.intended_fullscreen;
        self.intended_fullscreen = enter;
        if let Err(e) = host.request_fullscreen(enter) {
            warn!("fullscreen request denied enter={}", enter);
            return Err(e);
        }
        Ok(())
    }

    /// Resync from the platform's change notification. One-way: platform
    /// truth overwrites both the intent and the confirmed state.
    pub fn on_fullscreen_change(&mut self, actual: bool) {
        self.intended_fullscreen = actual;
        self.confirmed_fullscreen = actual;
    }

    /// Fullscreen state as mirrored to the UI. May lag platform truth
    /// between the optimistic flip and the change notification.
    pub fn is_fullscreen(&self) -> bool {
        self.intended_fullscreen
    }

    /// Last platform-confirmed fullscreen state.
    pub fn platform_fullscreen(&self) -> bool {
        self.confirmed_fullscreen
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}
