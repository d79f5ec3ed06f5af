use serde::Deserialize;

/// Quiescence window for debounced preview regeneration (milliseconds).
pub const DEBOUNCE_WINDOW_MS: u64 = 1000;

/// Lower bound of the viewport magnification range.
pub const ZOOM_MIN: f64 = 0.5;

/// Upper bound of the viewport magnification range.
pub const ZOOM_MAX: f64 = 3.0;

/// Magnification step applied by zoom_in / zoom_out.
pub const ZOOM_STEP: f64 = 0.2;

/// Top-level configuration for the preview engine.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Endpoint for preview-quality generation requests.
    pub preview_endpoint: String,
    /// Endpoint for final-quality (download) generation requests.
    pub document_endpoint: String,
    /// Debounce quiescence window in milliseconds.
    pub debounce_ms: u64,
    /// Directory where downloaded documents are saved.
    pub save_dir: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            preview_endpoint: String::new(),
            document_endpoint: String::new(),
            debounce_ms: DEBOUNCE_WINDOW_MS,
            save_dir: String::new(),
        }
    }
}
