use thiserror::Error;

/// Failures surfaced to the host UI. All of them are recoverable: a
/// generation failure leaves the last good preview on screen, a download
/// failure only reports itself, and a denied fullscreen request is resynced
/// from the platform change notification.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("platform denied the fullscreen request")]
    FullscreenDenied,
}
