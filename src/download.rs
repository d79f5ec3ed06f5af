// Explicit document download: an independent, non-debounced final-quality
// generation call plus a local save through a short-lived handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::generator::traits::DocumentGenerator;
use crate::preview::artifact::ArtifactStore;

pub struct DownloadService {
    generator: Arc<dyn DocumentGenerator>,
    save_dir: PathBuf,
    /// Holds the download's handle only between generation and save.
    handles: ArtifactStore,
}

impl DownloadService {
    pub fn new(generator: Arc<dyn DocumentGenerator>, save_dir: impl AsRef<Path>) -> Self {
        Self {
            generator,
            save_dir: save_dir.as_ref().to_path_buf(),
            handles: ArtifactStore::new(),
        }
    }

    /// Build a service saving into the configured directory.
    pub fn from_config(generator: Arc<dyn DocumentGenerator>, config: &PreviewConfig) -> Self {
        Self::new(generator, &config.save_dir)
    }

    /// Number of download handles currently held. Always 0 outside an
    /// in-flight download.
    pub fn live_handles(&self) -> usize {
        self.handles.live_handles()
    }

    /// Generate the final-quality document and save it as
    /// `<document_type_key>_<timestamp>.pdf`. Independent of the preview
    /// pipeline: neither its artifact nor its status are touched.
    pub async fn download(
        &self,
        form: &Value,
        document_type_key: &str,
    ) -> Result<PathBuf, PreviewError> {
        let bytes = self
            .generator
            .generate_final(document_type_key, form)
            .await
            .map_err(|e| {
                warn!("download generation failed form_type={}: {}", document_type_key, e);
                PreviewError::DownloadFailed(e.to_string())
            })?;

        let handle = self.handles.set_artifact(bytes);
        let filename = format!(
            "{}_{}.pdf",
            document_type_key,
            Utc::now().format("%Y%m%d%H%M%S")
        );
        let path = self.save_dir.join(filename);

        debug!(
            "saving download form_type={} bytes={} path={}",
            document_type_key,
            handle.len(),
            path.display()
        );

        // The save runs on its own refcounted copy of the payload, so the
        // handle is released as soon as the write has been initiated, not
        // when it completes.
        let payload = handle.bytes().clone();
        let save = tokio::spawn(tokio::fs::write(path.clone(), payload));
        self.handles.release_all();

        match save.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("download save failed path={}: {}", path.display(), e);
                return Err(PreviewError::DownloadFailed(e.to_string()));
            }
            Err(e) => {
                warn!("download save task failed path={}: {}", path.display(), e);
                return Err(PreviewError::DownloadFailed(e.to_string()));
            }
        }

        info!(
            "download saved form_type={} path={}",
            document_type_key,
            path.display()
        );
        Ok(path)
    }
}
